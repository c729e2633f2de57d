//! # Hull Builder
//!
//! Recursive divide-and-conquer driver. The point set is split at the median
//! of its longest axis, both halves are built (in parallel above a size
//! threshold) and the two hulls are merged.
//!
//! ## Degenerate inputs
//!
//! Exact duplicates are collapsed first. A single distinct point gives a
//! one-vertex mesh and a collinear set gives the segment between its two
//! extreme points. Everything else is perturbed by a tiny inward offset and
//! a seeded jitter so that points inside a hull face or on a shared circle
//! never tie; output keeps the input coordinates.

use config::constants::{HullConfig, LEAF_SIZE};
use glam::DVec3;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{HullError, HullResult};
use crate::geometry::BoundingBox;
use crate::merge::{Merger, SplitPlane};
use crate::mesh::{Mesh, Sample};
use crate::points::dedup_points;

/// Point in the construction at which a mesh was produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// A leaf of at most three points.
    Leaf,
    /// The result of merging two sub-hulls.
    Merge(SplitPlane),
}

/// Receives every intermediate mesh of a construction.
///
/// Called from rayon worker threads when the build runs in parallel, so
/// implementations must be `Sync`.
pub trait StageObserver: Sync {
    /// Called once per leaf and once per merge result.
    fn observe(&self, stage: Stage, mesh: &Mesh);
}

impl<F> StageObserver for F
where
    F: Fn(Stage, &Mesh) + Sync,
{
    fn observe(&self, stage: Stage, mesh: &Mesh) {
        self(stage, mesh)
    }
}

/// Configurable hull construction.
///
/// # Example
///
/// ```rust
/// use dnc_hull::HullBuilder;
/// use config::constants::HullConfig;
/// use glam::DVec3;
///
/// let points = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(0.1, 0.1, 0.1),
/// ];
/// let hull = HullBuilder::with_config(HullConfig::default().sequential()).build(&points)?;
/// assert_eq!(hull.live_count(), 4);
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
#[derive(Clone, Copy, Default)]
pub struct HullBuilder<'a> {
    config: HullConfig,
    observer: Option<&'a dyn StageObserver>,
}

impl<'a> HullBuilder<'a> {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with an explicit configuration.
    pub fn with_config(config: HullConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Registers an observer for intermediate meshes.
    pub fn observer(mut self, observer: &'a dyn StageObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Builds the convex hull of `points`.
    ///
    /// # Errors
    ///
    /// - [`HullError::EmptyInput`] for an empty slice
    /// - [`HullError::InvalidInput`] for a NaN or infinite coordinate
    /// - [`HullError::MalformedTopology`] if a merge fails
    pub fn build(&self, points: &[DVec3]) -> HullResult<Mesh> {
        if points.is_empty() {
            return Err(HullError::EmptyInput);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(HullError::InvalidInput {
                index,
                message: format!("non-finite coordinate {}", points[index]),
            });
        }

        let unique = dedup_points(points);
        let bounds = BoundingBox::from_points(unique.iter().copied());
        let diagonal = bounds.diagonal();

        if unique.len() > 2 {
            if let Some((a, b)) = collinear_extremes(&unique, self.config.collinear_tolerance * diagonal) {
                debug!("{} collinear points, keeping the segment ends", unique.len());
                return Ok(self.leaf(&[Sample::exact(a), Sample::exact(b)]));
            }
        }

        let mut samples = self.perturb(&unique, diagonal);
        let mesh = self.build_range(&mut samples)?;
        info!(
            "hull of {} points ({} distinct): {} vertices, {} edges",
            points.len(),
            unique.len(),
            mesh.live_count(),
            mesh.edge_count()
        );
        Ok(mesh)
    }

    /// Pairs each point with its perturbed working position.
    fn perturb(&self, points: &[DVec3], diagonal: f64) -> Vec<Sample> {
        let centroid = points.iter().sum::<DVec3>() / points.len() as f64;
        let offset = self.config.perturbation * diagonal;
        let jitter = offset * self.config.jitter_ratio;
        let mut rng = SmallRng::seed_from_u64(self.config.seed);

        points
            .iter()
            .map(|&position| {
                let inward = (centroid - position).normalize_or_zero() * offset;
                let noise = DVec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ) * jitter;
                Sample {
                    position,
                    working: position + inward + noise,
                }
            })
            .collect()
    }

    fn leaf(&self, samples: &[Sample]) -> Mesh {
        let mesh = Mesh::leaf(samples);
        if let Some(observer) = self.observer {
            observer.observe(Stage::Leaf, &mesh);
        }
        mesh
    }

    fn build_range(&self, samples: &mut [Sample]) -> HullResult<Mesh> {
        let n = samples.len();
        if n <= LEAF_SIZE {
            return Ok(self.leaf(samples));
        }

        let axis = BoundingBox::from_points(samples.iter().map(|s| s.working)).longest_axis();
        let half = n / 2;
        samples.select_nth_unstable_by(half, |a, b| a.working[axis].total_cmp(&b.working[axis]));
        let (lower, upper) = samples.split_at_mut(half);

        let lower_max = lower
            .iter()
            .map(|s| s.working[axis])
            .fold(f64::NEG_INFINITY, f64::max);
        let upper_min = upper[0].working[axis];
        let split = SplitPlane {
            axis,
            value: 0.5 * (lower_max + upper_min),
        };

        let (lower_hull, upper_hull) = if n > self.config.parallel_threshold {
            rayon::join(|| self.build_range(lower), || self.build_range(upper))
        } else {
            (self.build_range(lower), self.build_range(upper))
        };

        let merged = Merger::new(&self.config).merge(lower_hull?, upper_hull?, split)?;
        if let Some(observer) = self.observer {
            observer.observe(Stage::Merge(split), &merged);
        }
        Ok(merged)
    }
}

/// Returns the two extreme points if every point lies within `tolerance`
/// of the line through them.
fn collinear_extremes(points: &[DVec3], tolerance: f64) -> Option<(DVec3, DVec3)> {
    let farthest_from = |origin: DVec3| {
        points
            .iter()
            .copied()
            .max_by(|p, q| p.distance_squared(origin).total_cmp(&q.distance_squared(origin)))
            .unwrap_or(origin)
    };
    let a = farthest_from(points[0]);
    let b = farthest_from(a);
    let direction = (b - a).normalize_or_zero();
    if direction == DVec3::ZERO {
        return None;
    }

    let collinear = points
        .iter()
        .all(|&p| (p - a).cross(direction).length() <= tolerance);
    collinear.then_some((a, b))
}

/// Builds the convex hull of `points` with the default configuration.
///
/// The result is the merged mesh as produced by the last merge; call
/// [`Mesh::compact`] before exporting, or use [`convex_hull`].
///
/// # Example
///
/// ```rust
/// use dnc_hull::build;
/// use glam::DVec3;
///
/// let mesh = build(&[DVec3::ZERO, DVec3::X])?;
/// assert_eq!(mesh.live_count(), 2);
/// assert!(mesh.export_faces().is_empty());
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
pub fn build(points: &[DVec3]) -> HullResult<Mesh> {
    HullBuilder::new().build(points)
}

/// Builds and compacts the convex hull of `points`.
pub fn convex_hull(points: &[DVec3]) -> HullResult<Mesh> {
    let mut mesh = build(points)?;
    mesh.compact();
    Ok(mesh)
}
