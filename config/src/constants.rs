//! # Configuration Constants
//!
//! Centralized constants for the hull pipeline. Precision values, the
//! perturbation applied to degenerate inputs and the recursion limits are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Perturbation**: Symbolic-style offsets that break coplanar ties
//! - **Recursion**: Leaf size, parallelism and walk limits

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Relative tolerance under which a point set is treated as collinear.
///
/// Measured as the largest distance of any point from the line through the
/// two extreme points, divided by the bounding box diagonal.
///
/// # Example
///
/// ```rust
/// use config::constants::COLLINEAR_TOLERANCE;
///
/// let diagonal = 10.0;
/// let max_offset = 1e-9;
/// assert!(max_offset <= COLLINEAR_TOLERANCE * diagonal);
/// ```
pub const COLLINEAR_TOLERANCE: f64 = 1e-7;

/// Relative tolerance used when checking convexity of a finished hull.
///
/// A vertex may sit this far (times the diagonal) outside a face plane and
/// still count as "on" it. The working-position perturbation is several
/// orders of magnitude smaller.
///
/// # Example
///
/// ```rust
/// use config::constants::{CONVEXITY_TOLERANCE, PERTURBATION_SCALE};
///
/// assert!(CONVEXITY_TOLERANCE > PERTURBATION_SCALE);
/// ```
pub const CONVEXITY_TOLERANCE: f64 = 1e-7;

// =============================================================================
// PERTURBATION CONSTANTS
// =============================================================================

/// Inward offset applied to every working position, relative to the
/// bounding box diagonal.
///
/// Each point is pulled towards the input centroid by this amount so that
/// points lying in the interior of a hull face become strictly interior.
///
/// # Example
///
/// ```rust
/// use config::constants::PERTURBATION_SCALE;
///
/// let diagonal = 2.0_f64.sqrt();
/// let offset = PERTURBATION_SCALE * diagonal;
/// assert!(offset < 1e-8);
/// ```
pub const PERTURBATION_SCALE: f64 = 1e-9;

/// Ratio between the random jitter and the inward offset.
///
/// The jitter breaks cospherical and coplanar ties between hull vertices
/// without overwhelming the inward offset.
///
/// # Example
///
/// ```rust
/// use config::constants::{JITTER_RATIO, PERTURBATION_SCALE};
///
/// let jitter = PERTURBATION_SCALE * JITTER_RATIO;
/// assert!(jitter < PERTURBATION_SCALE);
/// ```
pub const JITTER_RATIO: f64 = 1e-3;

/// Default seed for the jitter generator.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEED;
///
/// assert_ne!(DEFAULT_SEED, 0);
/// ```
pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

// =============================================================================
// RECURSION CONSTANTS
// =============================================================================

/// Largest point count handled by a leaf hull.
///
/// Leaves are complete graphs: a point, a segment or a triangle.
///
/// # Example
///
/// ```rust
/// use config::constants::LEAF_SIZE;
///
/// let points = 3;
/// assert!(points <= LEAF_SIZE);
/// ```
pub const LEAF_SIZE: usize = 3;

/// Sub-problem size above which the two halves are built in parallel.
///
/// Below this size the overhead of `rayon::join` outweighs the work.
///
/// # Example
///
/// ```rust
/// use config::constants::PARALLEL_THRESHOLD;
///
/// let points = 100_000;
/// assert!(points > PARALLEL_THRESHOLD);
/// ```
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Multiplier bounding the number of equator walk steps.
///
/// A merge of hulls with `n` vertices in total takes at most
/// `WALK_LIMIT_FACTOR * n + 8` steps before it is declared malformed.
///
/// # Example
///
/// ```rust
/// use config::constants::WALK_LIMIT_FACTOR;
///
/// let vertices = 100;
/// let limit = WALK_LIMIT_FACTOR * vertices + 8;
/// assert!(limit > 2 * vertices);
/// ```
pub const WALK_LIMIT_FACTOR: usize = 4;

// =============================================================================
// HULL CONFIGURATION
// =============================================================================

/// Tunable settings for one hull construction.
///
/// # Examples
/// ```
/// use config::constants::HullConfig;
/// let config = HullConfig::default();
/// assert!(config.parallel_threshold > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullConfig {
    /// Inward offset relative to the bounding box diagonal.
    pub perturbation: f64,
    /// Jitter magnitude relative to `perturbation`.
    pub jitter_ratio: f64,
    /// Seed for the jitter generator.
    pub seed: u64,
    /// Relative tolerance for collinear inputs.
    pub collinear_tolerance: f64,
    /// Sub-problem size above which halves are built in parallel.
    pub parallel_threshold: usize,
    /// Multiplier bounding the equator walk.
    pub walk_limit_factor: usize,
}

impl HullConfig {
    /// Builds a configuration, validating the perturbation parameters.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HullConfig;
    /// let cfg = HullConfig::new(1.0e-9, 1.0e-3, 7).expect("valid config");
    /// assert_eq!(cfg.seed, 7);
    /// ```
    pub fn new(perturbation: f64, jitter_ratio: f64, seed: u64) -> Result<Self, ConfigError> {
        if !(perturbation > 0.0 && perturbation < 1e-3) {
            return Err(ConfigError::InvalidPerturbation(perturbation));
        }
        if !(0.0..1.0).contains(&jitter_ratio) {
            return Err(ConfigError::InvalidJitterRatio(jitter_ratio));
        }
        Ok(Self {
            perturbation,
            jitter_ratio,
            seed,
            ..Self::default()
        })
    }

    /// Returns a copy that never builds halves in parallel.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HullConfig;
    /// let cfg = HullConfig::default().sequential();
    /// assert_eq!(cfg.parallel_threshold, usize::MAX);
    /// ```
    pub fn sequential(mut self) -> Self {
        self.parallel_threshold = usize::MAX;
        self
    }

    /// Returns a copy using a different jitter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            perturbation: PERTURBATION_SCALE,
            jitter_ratio: JITTER_RATIO,
            seed: DEFAULT_SEED,
            collinear_tolerance: COLLINEAR_TOLERANCE,
            parallel_threshold: PARALLEL_THRESHOLD,
            walk_limit_factor: WALK_LIMIT_FACTOR,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the perturbation is not a small positive number.
    InvalidPerturbation(f64),
    /// Raised when the jitter ratio is outside `[0, 1)`.
    InvalidJitterRatio(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPerturbation(value) => {
                write!(f, "perturbation must be in (0, 1e-3): {value}")
            }
            ConfigError::InvalidJitterRatio(value) => {
                write!(f, "jitter_ratio must be in [0, 1): {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
