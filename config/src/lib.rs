//! # Config Crate
//!
//! Centralized configuration constants for the divide-and-conquer convex hull.
//! All magic numbers and tunable parameters are defined here so the hull
//! library, its command-line front end and the tests agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{HullConfig, LEAF_SIZE, PERTURBATION_SCALE};
//!
//! // Leaves of the recursion hold at most three points
//! assert_eq!(LEAF_SIZE, 3);
//!
//! // A default configuration is always valid
//! let config = HullConfig::default();
//! assert_eq!(config.perturbation, PERTURBATION_SCALE);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic**: Every random choice is driven by an explicit seed
//! - **Scale Free**: Tolerances are relative to the input's bounding box

pub mod constants;
