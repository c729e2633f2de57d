//! # Hull Merge
//!
//! Stitches two disjoint convex hulls, separated by an axis-aligned plane,
//! into one convex hull.
//!
//! ## Algorithm Overview
//!
//! 1. **Seed bridge**: find one edge of the merged hull joining the two
//!    operands (a common tangent in a projection of the split plane)
//! 2. **Equator walk**: rotate around the current bridge edge, advancing one
//!    side at a time, until the ring of bridge edges closes
//! 3. **Interior pruning**: faces of each operand facing the other operand
//!    are hidden; their vertices are removed by flood fill
//! 4. **Weld**: append the upper operand's vertices, add the bridge edges
//!    and drop edges that ended up inside the merged solid
//!
//! All decisions use the vertices' working (perturbed) positions.

mod evaluator;
mod prune;
mod walk;
mod weld;

#[cfg(test)]
mod tests;

use config::constants::HullConfig;
use log::debug;

use crate::error::HullResult;
use crate::mesh::{Mesh, VertexId};

pub(crate) use evaluator::Evaluator;

/// One of the two operands of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Operand below the split value.
    Lower,
    /// Operand above the split value.
    Upper,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Lower, Side::Upper];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Lower => 0,
            Side::Upper => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }
}

/// An edge joining a vertex of the lower operand to one of the upper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bridge {
    /// Endpoint in the lower operand
    pub lower: VertexId,
    /// Endpoint in the upper operand
    pub upper: VertexId,
}

impl Bridge {
    /// Creates a bridge between two operand vertices.
    pub fn new(lower: VertexId, upper: VertexId) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub(crate) fn get(self, side: Side) -> VertexId {
        match side {
            Side::Lower => self.lower,
            Side::Upper => self.upper,
        }
    }

    #[inline]
    pub(crate) fn with(self, side: Side, vertex: VertexId) -> Self {
        match side {
            Side::Lower => Self::new(vertex, self.upper),
            Side::Upper => Self::new(self.lower, vertex),
        }
    }
}

/// Axis-aligned plane separating the two operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlane {
    /// Axis index (0 = x, 1 = y, 2 = z)
    pub axis: usize,
    /// Coordinate of the plane along `axis`
    pub value: f64,
}

/// Merges hulls with a configurable walk limit.
#[derive(Debug, Clone, Copy)]
pub struct Merger {
    walk_limit_factor: usize,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(&HullConfig::default())
    }
}

impl Merger {
    /// Creates a merger using the limits of `config`.
    pub fn new(config: &HullConfig) -> Self {
        Self {
            walk_limit_factor: config.walk_limit_factor,
        }
    }

    /// Merges `lower` and `upper` into one hull.
    ///
    /// Every vertex of `lower` must lie below `split.value` along
    /// `split.axis` and every vertex of `upper` above it (in working
    /// positions). `upper` is consumed; the result reuses `lower`'s storage
    /// and is compacted.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::MalformedTopology`](crate::HullError) when the
    /// bridge ring cannot be traced or is inconsistent.
    pub fn merge(&self, mut lower: Mesh, mut upper: Mesh, split: SplitPlane) -> HullResult<Mesh> {
        if lower.is_empty() {
            return Ok(upper);
        }
        if upper.is_empty() {
            return Ok(lower);
        }

        let evaluator = Evaluator::new(&lower, &upper, split);
        let seed = evaluator.seed_bridge(&lower, &upper)?;

        let limit = self.walk_limit_factor * (lower.slot_count() + upper.slot_count()) + 8;
        let ring = walk::equator_walk(&lower, &upper, seed, limit)?;
        debug!(
            "merge {}+{} on axis {} at {:.6}: seed ({}, {}), {} bridges",
            lower.slot_count(),
            upper.slot_count(),
            split.axis,
            split.value,
            seed.lower,
            seed.upper,
            ring.len()
        );

        let nominations = prune::prune_hidden(&mut lower, &mut upper, &ring)?;
        let merged = weld::weld(lower, upper, &ring, &nominations);
        Ok(merged)
    }
}

/// Merges two hulls separated by the plane `axis[split_coord] = split_val`.
///
/// Convenience wrapper around [`Merger::merge`] with default limits.
///
/// # Example
///
/// ```rust
/// use dnc_hull::{build, merge};
/// use glam::DVec3;
///
/// let left = build(&[DVec3::ZERO, DVec3::Y, DVec3::Z])?;
/// let right = build(&[DVec3::new(2.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0)])?;
/// let hull = merge(left, right, 0, 1.0)?;
/// assert_eq!(hull.live_count(), 5);
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
pub fn merge(lower: Mesh, upper: Mesh, split_coord: usize, split_val: f64) -> HullResult<Mesh> {
    Merger::default().merge(
        lower,
        upper,
        SplitPlane {
            axis: split_coord,
            value: split_val,
        },
    )
}
