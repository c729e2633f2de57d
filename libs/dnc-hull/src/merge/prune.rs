//! Interior pruning: removes the parts of each operand hidden by the merge.

use std::collections::{HashMap, HashSet};

use config::constants::LEAF_SIZE;
use log::debug;

use crate::error::{HullError, HullResult, MergePhase};
use crate::geometry::{angle_between, angular_extremes, edge_axis, project_perpendicular};
use crate::mesh::{Mesh, VertexId};

use super::{Bridge, Side};

/// Undirected edge with the smaller identifier first.
pub(crate) type Edge = (VertexId, VertexId);

/// Edges of one operand that faces on both sides marked as hidden.
///
/// Keys use the operand's own identifiers; the count is the number of
/// hidden faces that nominated the edge.
pub(crate) type Nominations = HashMap<Edge, u32>;

#[inline]
fn edge(u: VertexId, v: VertexId) -> Edge {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

#[inline]
fn face(a: VertexId, b: VertexId, c: VertexId) -> [VertexId; 3] {
    let mut f = [a, b, c];
    f.sort_unstable();
    f
}

/// Movement of one operand's endpoint between consecutive bridges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub from: VertexId,
    pub to: VertexId,
    /// Endpoint held fixed in the other operand
    pub pivot: VertexId,
}

/// Splits the closed ring into per-operand steps.
///
/// Consecutive bridges (including the wrap from last to first) must share
/// exactly one endpoint; the other endpoint moves along an edge of its
/// operand.
pub(crate) fn ring_steps(ring: &[Bridge]) -> HullResult<[Vec<Step>; 2]> {
    let mut steps = [Vec::new(), Vec::new()];
    if ring.len() < 2 {
        return Ok(steps);
    }

    for (k, &next) in ring.iter().enumerate() {
        let prev = ring[(k + ring.len() - 1) % ring.len()];
        if k == 0 && prev == next {
            continue;
        }
        let side = if prev.lower == next.lower {
            Side::Upper
        } else if prev.upper == next.upper {
            Side::Lower
        } else {
            return Err(HullError::malformed(
                MergePhase::InteriorPruning,
                prev.lower.index(),
                prev.upper.index(),
                format!(
                    "bridge ({}, {}) shares no endpoint with its successor",
                    next.lower, next.upper
                ),
            ));
        };
        steps[side.index()].push(Step {
            from: prev.get(side),
            to: next.get(side),
            pivot: prev.get(side.other()),
        });
    }
    Ok(steps)
}

/// Marks the ring vertices, removes hidden vertices from both operands and
/// returns the edges nominated for removal on each side.
pub(crate) fn prune_hidden(
    lower: &mut Mesh,
    upper: &mut Mesh,
    ring: &[Bridge],
) -> HullResult<[Nominations; 2]> {
    set_ring_boundary(lower, upper, ring, true);
    let steps = ring_steps(ring)?;

    let lower_nominations = prune_side(lower, upper, &steps[Side::Lower.index()]);
    let upper_nominations = prune_side(upper, lower, &steps[Side::Upper.index()]);

    set_ring_boundary(lower, upper, ring, false);
    Ok([lower_nominations, upper_nominations])
}

fn set_ring_boundary(lower: &mut Mesh, upper: &mut Mesh, ring: &[Bridge], boundary: bool) {
    for bridge in ring {
        lower.set_boundary(bridge.lower, boundary);
        upper.set_boundary(bridge.upper, boundary);
    }
}

/// Common neighbours of `u` and `v`, in `u`'s adjacency order.
fn common_neighbors(mesh: &Mesh, u: VertexId, v: VertexId) -> Vec<VertexId> {
    let others = mesh.neighbors(v);
    mesh.neighbors(u)
        .iter()
        .copied()
        .filter(|n| others.contains(n))
        .collect()
}

/// Apexes of the (at most two) faces hinged on edge `u - v`.
fn faces_at(mesh: &Mesh, u: VertexId, v: VertexId) -> Vec<VertexId> {
    let candidates: Vec<(VertexId, _)> = common_neighbors(mesh, u, v)
        .into_iter()
        .map(|n| (n, mesh.working(n)))
        .collect();
    angular_extremes(mesh.working(u), mesh.working(v), &candidates)
}

/// Prunes one operand and collects its nominations.
fn prune_side(mesh: &mut Mesh, other: &Mesh, steps: &[Step]) -> Nominations {
    let ring_edges: HashSet<Edge> = steps.iter().map(|s| edge(s.from, s.to)).collect();
    let mut nominations = Nominations::new();
    let mut hidden: Vec<VertexId> = Vec::new();

    if mesh.slot_count() <= LEAF_SIZE {
        // No faces to flood: everything off the ring goes.
        for (i, vertex) in mesh.vertices().iter().enumerate() {
            let id = VertexId::new(i);
            if !vertex.is_boundary() {
                hidden.push(id);
            }
            for &n in vertex.adjacency() {
                if id < n && !ring_edges.contains(&(id, n)) {
                    *nominations.entry((id, n)).or_insert(0) += 2;
                }
            }
        }
    } else {
        let hidden_faces = hidden_faces(mesh, other, steps, &ring_edges);
        let mut hidden_set = HashSet::new();
        for f in &hidden_faces {
            for &v in f {
                if !mesh.vertex(v).is_boundary() {
                    hidden_set.insert(v);
                }
            }
            for (u, v) in [(f[0], f[1]), (f[0], f[2]), (f[1], f[2])] {
                if !ring_edges.contains(&(u, v))
                    && mesh.vertex(u).is_boundary()
                    && mesh.vertex(v).is_boundary()
                {
                    *nominations.entry((u, v)).or_insert(0) += 1;
                }
            }
        }
        hidden.extend(hidden_set);
        hidden.sort_unstable();
    }

    let removed = remove_flood(mesh, hidden);
    debug!(
        "pruned {} of {} vertices, {} nominated edges",
        removed,
        mesh.slot_count(),
        nominations.len()
    );
    nominations
}

/// Faces of `mesh` that the merged hull covers.
///
/// For every step along the ring, the face on the edge `from - to` that
/// turns towards the other operand's pivot is hidden (both faces when the
/// ring runs along the edge in both directions). Hidden faces then spread
/// across every edge that is not part of the ring.
fn hidden_faces(
    mesh: &Mesh,
    other: &Mesh,
    steps: &[Step],
    ring_edges: &HashSet<Edge>,
) -> HashSet<[VertexId; 3]> {
    let directed: HashSet<(VertexId, VertexId)> = steps.iter().map(|s| (s.from, s.to)).collect();
    let mut hidden = HashSet::new();
    let mut stack = Vec::new();

    for step in steps {
        let apexes = faces_at(mesh, step.from, step.to);
        let seeds: Vec<VertexId> = if directed.contains(&(step.to, step.from)) || apexes.len() < 2 {
            apexes
        } else {
            let origin = mesh.working(step.from);
            let axis = edge_axis(origin, mesh.working(step.to));
            let toward = project_perpendicular(origin, axis, other.working(step.pivot));
            let gap = |v: VertexId| {
                angle_between(toward, project_perpendicular(origin, axis, mesh.working(v)))
            };
            if gap(apexes[0]) < gap(apexes[1]) {
                vec![apexes[0]]
            } else {
                vec![apexes[1]]
            }
        };
        for apex in seeds {
            let f = face(step.from, step.to, apex);
            if hidden.insert(f) {
                stack.push(f);
            }
        }
    }

    while let Some(f) = stack.pop() {
        for (u, v, opposite) in [(f[0], f[1], f[2]), (f[0], f[2], f[1]), (f[1], f[2], f[0])] {
            if ring_edges.contains(&(u, v)) {
                continue;
            }
            for apex in faces_at(mesh, u, v) {
                if apex == opposite {
                    continue;
                }
                let g = face(u, v, apex);
                if hidden.insert(g) {
                    stack.push(g);
                }
            }
        }
    }
    hidden
}

/// Removes the queued vertices and every interior vertex reachable from them.
///
/// Boundary vertices stop the flood; they only lose their edge to the
/// removed vertex. Returns the number of tombstoned vertices.
fn remove_flood(mesh: &mut Mesh, mut queue: Vec<VertexId>) -> usize {
    let mut removed = 0;
    let mut head = 0;
    while head < queue.len() {
        let v = queue[head];
        head += 1;
        let vertex = mesh.vertex(v);
        if !vertex.is_live() || vertex.is_boundary() {
            continue;
        }
        for n in vertex.adjacency().to_vec() {
            let neighbor = mesh.vertex(n);
            if !neighbor.is_live() {
                continue;
            }
            if neighbor.is_boundary() {
                mesh.forget_neighbor(n, v);
            } else {
                queue.push(n);
            }
        }
        mesh.tombstone(v);
        removed += 1;
    }
    removed
}
