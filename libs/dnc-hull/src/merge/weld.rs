//! Weld: joins the pruned operands along the bridge ring.

use log::trace;

use crate::mesh::Mesh;

use super::prune::Nominations;
use super::Bridge;

/// Appends `upper` to `lower`, adds the ring edges, drops internal links and
/// compacts the result.
pub(crate) fn weld(mut lower: Mesh, upper: Mesh, ring: &[Bridge], nominations: &[Nominations; 2]) -> Mesh {
    let offset = lower.absorb(upper);
    for bridge in ring {
        lower.connect(bridge.lower, bridge.upper.shifted(offset));
    }
    remove_internal_links(&mut lower, nominations, offset);
    lower.compact();
    lower
}

/// Deletes every edge nominated by two hidden faces.
///
/// Such an edge joins two ring vertices of the same operand but has hidden
/// faces on both sides, so it now runs through the merged solid. Edges
/// nominated once still bound a visible face and are kept.
pub(crate) fn remove_internal_links(mesh: &mut Mesh, nominations: &[Nominations; 2], offset: usize) {
    for (nominated, shift) in nominations.iter().zip([0, offset]) {
        for (&(u, v), &count) in nominated {
            if count >= 2 {
                trace!("internal link ({}, {})", u.shifted(shift), v.shifted(shift));
                mesh.disconnect(u.shifted(shift), v.shifted(shift));
            }
        }
    }
}
