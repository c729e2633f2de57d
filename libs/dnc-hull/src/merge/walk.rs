//! Equator walk: traces the ring of bridge edges between two hulls.

use log::trace;

use crate::error::{HullError, HullResult, MergePhase};
use crate::geometry::{orient3d, DVec3};
use crate::mesh::Mesh;

use super::{Bridge, Side};

/// Walks around the equator starting at `seed`.
///
/// Each step rotates a plane about the current bridge edge. The candidates
/// are the bridges obtained by moving either endpoint to one of its
/// neighbours; the winner is the candidate no other candidate lies above.
/// The bridge visited just before the current one is never a candidate.
///
/// The walk ends when no candidate is left, when the winner is the current
/// bridge or when it returns to the seed. Running past `limit` steps is an
/// error.
pub(crate) fn equator_walk(
    lower: &Mesh,
    upper: &Mesh,
    seed: Bridge,
    limit: usize,
) -> HullResult<Vec<Bridge>> {
    let meshes = [lower, upper];
    let mut ring = vec![seed];
    let mut current = seed;

    for _ in 0..limit {
        let previous = ring.len().checked_sub(2).map(|i| ring[i]);
        let a = lower.working(current.lower);
        let b = upper.working(current.upper);

        let mut best: Option<(Bridge, DVec3)> = None;
        for side in Side::BOTH {
            let mesh = meshes[side.index()];
            for &n in mesh.neighbors(current.get(side)) {
                let candidate = current.with(side, n);
                if previous == Some(candidate) {
                    continue;
                }
                let p = mesh.working(n);
                match best {
                    Some((_, q)) if orient3d(a, b, q, p) <= 0.0 => {}
                    _ => best = Some((candidate, p)),
                }
            }
        }

        match best {
            Some((next, _)) if next != current && next != seed => {
                trace!("bridge ({}, {})", next.lower, next.upper);
                ring.push(next);
                current = next;
            }
            _ => return Ok(ring),
        }
    }

    Err(HullError::malformed(
        MergePhase::EquatorWalk,
        current.lower.index(),
        current.upper.index(),
        format!("equator did not close within {limit} steps"),
    ))
}
