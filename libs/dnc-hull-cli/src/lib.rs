//! # dnc-hull CLI
//!
//! Reads a point file, builds its convex hull and writes the result as
//! Wavefront OBJ.
//!
//! ## Usage
//! - `dnc-hull points.txt` - hull to stdout
//! - `dnc-hull - -o hull.obj` - points from stdin, hull to a file
//! - `dnc-hull points.txt --dump-stages stages/` - also write every leaf and
//!   merge result as `stages/stage_NNNN.obj`

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use config::constants::HullConfig;
use dnc_hull::export::write_obj;
use dnc_hull::geometry::DVec3;
use dnc_hull::points::read_points;
use dnc_hull::{HullBuilder, Mesh, Stage, StageObserver};

/// Divide-and-conquer 3D convex hull
#[derive(Parser, Debug)]
#[command(name = "dnc-hull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Point file, or `-` for stdin
    pub input: PathBuf,

    /// OBJ output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Build on the current thread only
    #[arg(long)]
    pub sequential: bool,

    /// Perturbation seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write every intermediate mesh to this directory
    #[arg(long, value_name = "DIR")]
    pub dump_stages: Option<PathBuf>,
}

impl Cli {
    /// Hull configuration selected by the flags.
    pub fn hull_config(&self) -> HullConfig {
        let mut config = HullConfig::default();
        if self.sequential {
            config = config.sequential();
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// Writes each observed mesh to a numbered OBJ file.
struct StageDump {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl StageDump {
    fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating stage directory {}", dir.display()))?;
        Ok(Self {
            dir,
            counter: AtomicUsize::new(0),
        })
    }

    fn written(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}

impl StageObserver for StageDump {
    fn observe(&self, stage: Stage, mesh: &Mesh) {
        let index = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("stage_{index:04}.obj"));
        let result = File::create(&path)
            .map_err(dnc_hull::HullError::from)
            .and_then(|file| write_obj(mesh, BufWriter::new(file)));
        match result {
            Ok(()) => log::trace!("{:?} -> {}", stage, path.display()),
            Err(e) => log::warn!("could not write {}: {}", path.display(), e),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // A second call (tests) keeps the first logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn load_points(input: &Path) -> Result<Vec<DVec3>> {
    if input == Path::new("-") {
        read_points(io::stdin().lock()).context("reading points from stdin")
    } else {
        let file =
            File::open(input).with_context(|| format!("opening {}", input.display()))?;
        read_points(BufReader::new(file)).with_context(|| format!("reading {}", input.display()))
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let points = load_points(&cli.input)?;
    log::info!("read {} points from {}", points.len(), cli.input.display());

    let dump = cli.dump_stages.clone().map(StageDump::new).transpose()?;
    let mut builder = HullBuilder::with_config(cli.hull_config());
    if let Some(dump) = &dump {
        builder = builder.observer(dump);
    }

    let mut hull = builder.build(&points).context("building convex hull")?;
    hull.compact();

    match &cli.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_obj(&hull, BufWriter::new(file))
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_obj(&hull, &mut out).context("writing to stdout")?;
            out.flush()?;
        }
    }

    if let Some(dump) = &dump {
        log::info!("wrote {} stage meshes", dump.written());
    }
    Ok(())
}
