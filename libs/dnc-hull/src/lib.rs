//! # dnc-hull
//!
//! Divide-and-conquer 3D convex hull. Points are split at the median of
//! their longest axis, the halves are solved recursively and neighbouring
//! hulls are merged by walking the ring of edges that bridges them.
//!
//! ## Architecture
//!
//! ```text
//! points → build (split / recurse) → merge (seed, walk, prune, weld) → Mesh
//!                                                                      ↓
//!                                               compact → export_faces / OBJ
//! ```
//!
//! A [`Mesh`] stores vertices and their adjacency only; triangles are
//! inferred from shared neighbours when exported.
//!
//! ## Usage
//!
//! ```rust
//! use dnc_hull::convex_hull;
//! use glam::DVec3;
//!
//! let corners: Vec<DVec3> = (0..8)
//!     .map(|i| DVec3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
//!     .collect();
//! let hull = convex_hull(&corners)?;
//! assert_eq!(hull.live_count(), 8);
//! assert_eq!(hull.edge_count(), 18);
//! assert_eq!(hull.export_faces().len(), 12);
//! # Ok::<(), dnc_hull::HullError>(())
//! ```

pub mod build;
pub mod error;
pub mod export;
pub mod geometry;
pub mod merge;
pub mod mesh;
pub mod points;

pub use build::{build, convex_hull, HullBuilder, Stage, StageObserver};
pub use error::{HullError, HullResult, MergePhase};
pub use merge::{merge, Bridge, Merger, SplitPlane};
pub use mesh::{Mesh, Vertex, VertexId, VertexState};
