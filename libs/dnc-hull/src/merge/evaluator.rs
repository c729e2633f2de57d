//! Projection of both operands onto the split plane and the seed search.

use crate::error::{HullError, HullResult, MergePhase};
use crate::geometry::{orient2d, BoundingBox, DVec3};
use crate::mesh::{Mesh, VertexId};

use super::{Bridge, SplitPlane};

/// Planar view of a merge.
///
/// Points are projected onto the plane spanned by the split axis and the
/// remaining axis along which the two operands extend the most, centred on
/// the split value and the midpoint of the operands' centres.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluator {
    split_axis: usize,
    tangent_axis: usize,
    pivot: [f64; 2],
}

impl Evaluator {
    pub fn new(lower: &Mesh, upper: &Mesh, split: SplitPlane) -> Self {
        let working: BoundingBox = lower
            .vertices()
            .iter()
            .chain(upper.vertices())
            .filter(|v| v.is_live())
            .map(|v| v.working())
            .collect();
        let extent = working.extent();

        let (first, second) = match split.axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let tangent_axis = if extent[second] > extent[first] {
            second
        } else {
            first
        };

        let center = (lower.centroid() + upper.centroid()) * 0.5;
        Self {
            split_axis: split.axis,
            tangent_axis,
            pivot: [split.value, center[tangent_axis]],
        }
    }

    #[inline]
    pub fn project(&self, p: DVec3) -> [f64; 2] {
        [
            p[self.split_axis] - self.pivot[0],
            p[self.tangent_axis] - self.pivot[1],
        ]
    }

    /// Planar orientation of three projected points.
    #[inline]
    pub fn orient(&self, p: DVec3, q: DVec3, r: DVec3) -> f64 {
        orient2d(self.project(p), self.project(q), self.project(r))
    }

    /// Finds the first bridge edge of the merged hull.
    ///
    /// Starting from the first vertex of each operand, each side in turn
    /// hops to any neighbour that lies below the line through the current
    /// pair, until neither side can move. The resulting pair is the lower
    /// common tangent of the projected operands, which lifts to an edge of
    /// the merged hull.
    pub fn seed_bridge(&self, lower: &Mesh, upper: &Mesh) -> HullResult<Bridge> {
        let mut a = VertexId::new(0);
        let mut b = VertexId::new(0);
        let limit = 2 * (lower.slot_count() + upper.slot_count()) + 8;

        for _ in 0..limit {
            let mut changed = false;

            while let Some(&n) = lower
                .neighbors(a)
                .iter()
                .find(|&&n| self.orient(upper.working(b), lower.working(a), lower.working(n)) > 0.0)
            {
                a = n;
                changed = true;
            }

            while let Some(&n) = upper
                .neighbors(b)
                .iter()
                .find(|&&n| self.orient(lower.working(a), upper.working(b), upper.working(n)) < 0.0)
            {
                b = n;
                changed = true;
            }

            if !changed {
                return Ok(Bridge::new(a, b));
            }
        }

        Err(HullError::malformed(
            MergePhase::SeedBridge,
            a.index(),
            b.index(),
            "tangent search did not settle",
        ))
    }
}
