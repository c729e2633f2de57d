//! # Hull Mesh
//!
//! Vertex arena with an undirected adjacency graph. The graph is the
//! 1-skeleton of a triangulated convex polytope; faces are not stored but
//! inferred from shared neighbours.

use std::fmt;

use glam::DVec3;

use crate::error::{HullError, HullResult, MergePhase};
use crate::geometry::{angular_extremes, orient3d, BoundingBox};

/// Translation table entry for a removed slot.
const NO_INDEX: usize = usize::MAX;

/// Index of a vertex slot within one [`Mesh`].
///
/// Identifiers are only meaningful for the mesh that issued them. When two
/// meshes are welded the absorbed mesh's identifiers are re-based with
/// [`VertexId::shifted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    /// Wraps a slot index.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns the identifier moved by `offset` slots.
    #[inline]
    pub fn shifted(self, offset: usize) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a vertex slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexState {
    /// Part of the hull.
    Live,
    /// Logically deleted, awaiting [`Mesh::compact`].
    Tombstoned,
}

/// An input point paired with the perturbed position used by predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub position: DVec3,
    pub working: DVec3,
}

impl Sample {
    /// A sample whose working position is the point itself.
    pub fn exact(position: DVec3) -> Self {
        Self {
            position,
            working: position,
        }
    }
}

/// A hull vertex and its incident edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    position: DVec3,
    working: DVec3,
    adjacency: Vec<VertexId>,
    boundary: bool,
    state: VertexState,
}

impl Vertex {
    fn new(sample: Sample, adjacency: Vec<VertexId>) -> Self {
        Self {
            position: sample.position,
            working: sample.working,
            adjacency,
            boundary: false,
            state: VertexState::Live,
        }
    }

    /// Input position of the vertex.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Perturbed position used by every geometric decision.
    #[inline]
    pub fn working(&self) -> DVec3 {
        self.working
    }

    /// Neighbours of the vertex.
    #[inline]
    pub fn adjacency(&self) -> &[VertexId] {
        &self.adjacency
    }

    /// Whether the vertex currently lies on a merge equator.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    /// Whether the slot still holds a hull vertex.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.state == VertexState::Live
    }

    /// Lifecycle state of the slot.
    #[inline]
    pub fn state(&self) -> VertexState {
        self.state
    }
}

/// Convex hull as a vertex arena plus adjacency graph.
///
/// # Example
///
/// ```rust
/// use dnc_hull::build;
/// use glam::DVec3;
///
/// let mut mesh = build(&[
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
/// ])?;
/// mesh.compact();
/// assert_eq!(mesh.live_count(), 4);
/// assert_eq!(mesh.export_faces().len(), 4);
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    bounds: BoundingBox,
    centroid: DVec3,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            bounds: BoundingBox::empty(),
            centroid: DVec3::ZERO,
        }
    }

    /// Builds a fully connected mesh from at most three samples.
    ///
    /// Each vertex lists every other vertex, highest index first.
    pub(crate) fn leaf(samples: &[Sample]) -> Self {
        let n = samples.len();
        let vertices = samples
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let adjacency = (0..n).rev().filter(|&j| j != i).map(VertexId::new).collect();
                Vertex::new(sample, adjacency)
            })
            .collect();
        let centroid = if n == 0 {
            DVec3::ZERO
        } else {
            samples.iter().map(|s| s.position).sum::<DVec3>() / n as f64
        };
        Self {
            vertices,
            bounds: samples.iter().map(|s| s.position).collect(),
            centroid,
        }
    }

    /// Number of slots, including tombstoned ones.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live vertices.
    pub fn live_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_live()).count()
    }

    /// Returns true if the mesh has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.adjacency.len()).sum::<usize>() / 2
    }

    /// All vertex slots.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the vertex in slot `id`.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Input positions of all slots, in slot order.
    pub fn positions(&self) -> Vec<DVec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Perturbed position of slot `id`.
    #[inline]
    pub fn working(&self, id: VertexId) -> DVec3 {
        self.vertices[id.index()].working
    }

    /// Neighbours of slot `id`.
    #[inline]
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        &self.vertices[id.index()].adjacency
    }

    /// Bounding box of the input positions.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Weighted centre of the points the mesh was built from.
    #[inline]
    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    /// Returns true if `a` lists `b` as a neighbour.
    #[inline]
    pub fn is_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Adds the edge `a - b` unless it already exists.
    pub(crate) fn connect(&mut self, a: VertexId, b: VertexId) {
        if !self.is_adjacent(a, b) {
            self.vertex_mut(a).adjacency.push(b);
            self.vertex_mut(b).adjacency.push(a);
        }
    }

    /// Removes the edge `a - b` from both endpoints.
    pub(crate) fn disconnect(&mut self, a: VertexId, b: VertexId) {
        self.vertex_mut(a).adjacency.retain(|&n| n != b);
        self.vertex_mut(b).adjacency.retain(|&n| n != a);
    }

    /// Removes `a` from the adjacency of `b` only.
    pub(crate) fn forget_neighbor(&mut self, b: VertexId, a: VertexId) {
        self.vertex_mut(b).adjacency.retain(|&n| n != a);
    }

    pub(crate) fn set_boundary(&mut self, id: VertexId, boundary: bool) {
        self.vertex_mut(id).boundary = boundary;
    }

    /// Clears the adjacency of `id` and marks its slot deleted.
    pub(crate) fn tombstone(&mut self, id: VertexId) {
        let vertex = self.vertex_mut(id);
        vertex.adjacency.clear();
        vertex.state = VertexState::Tombstoned;
    }

    /// Appends every slot of `other`, re-basing its identifiers.
    ///
    /// Returns the offset added to `other`'s identifiers. Bounding boxes are
    /// united and the centroid becomes the live-count weighted average.
    pub(crate) fn absorb(&mut self, other: Mesh) -> usize {
        let offset = self.vertices.len();
        let own = self.live_count() as f64;
        let theirs = other.live_count() as f64;
        if own + theirs > 0.0 {
            self.centroid = (self.centroid * own + other.centroid * theirs) / (own + theirs);
        }
        self.bounds.union(&other.bounds);

        self.vertices.extend(other.vertices.into_iter().map(|mut vertex| {
            for n in &mut vertex.adjacency {
                *n = n.shifted(offset);
            }
            vertex
        }));
        offset
    }

    /// Removes tombstoned slots and renumbers the survivors densely.
    ///
    /// Adjacency is remapped through a translation table built in the same
    /// pass. Calling it on a compact mesh changes nothing.
    pub fn compact(&mut self) {
        let mut translation = vec![NO_INDEX; self.vertices.len()];
        let mut next = 0;
        for (slot, vertex) in self.vertices.iter().enumerate() {
            if vertex.is_live() {
                translation[slot] = next;
                next += 1;
            }
        }
        if next == self.vertices.len() {
            return;
        }

        self.vertices.retain(|v| v.is_live());
        for vertex in &mut self.vertices {
            vertex.adjacency = vertex
                .adjacency
                .iter()
                .filter_map(|n| match translation[n.index()] {
                    NO_INDEX => None,
                    index => Some(VertexId(index)),
                })
                .collect();
        }
    }

    /// Sorted neighbour lists of every slot, as plain indices.
    fn sorted_adjacency(&self) -> Vec<Vec<usize>> {
        self.vertices
            .iter()
            .map(|v| {
                let mut adjacency: Vec<usize> = v.adjacency.iter().map(|n| n.index()).collect();
                adjacency.sort_unstable();
                adjacency
            })
            .collect()
    }

    /// Infers the triangular faces from the adjacency graph.
    ///
    /// For every edge `(i, j)` with `i < j`, each common neighbour `k > j`
    /// yields the face `(i, j, k)`. Where an edge has more than two common
    /// neighbours only the two angular extremes around it count. Indices are
    /// 0-based slot indices, each face sorted ascending, the list sorted and
    /// free of duplicates.
    pub fn export_faces(&self) -> Vec<[usize; 3]> {
        let adjacency = self.sorted_adjacency();
        let mut faces = Vec::new();

        for (i, neighbors) in adjacency.iter().enumerate() {
            for &j in neighbors.iter().filter(|&&j| j > i) {
                let common = sorted_intersection(neighbors, &adjacency[j]);
                let apexes = if common.len() > 2 {
                    let candidates: Vec<(usize, DVec3)> = common
                        .iter()
                        .map(|&k| (k, self.vertices[k].working))
                        .collect();
                    angular_extremes(self.vertices[i].working, self.vertices[j].working, &candidates)
                } else {
                    common
                };
                faces.extend(apexes.into_iter().filter(|&k| k > j).map(|k| [i, j, k]));
            }
        }

        faces.sort_unstable();
        faces.dedup();
        faces
    }

    /// Faces wound counter-clockwise when seen from outside the hull.
    ///
    /// Orientation is decided against the centre of the live vertices. Faces
    /// of a flat hull keep their sorted order.
    pub fn oriented_faces(&self) -> Vec<[usize; 3]> {
        let live: Vec<DVec3> = self
            .vertices
            .iter()
            .filter(|v| v.is_live())
            .map(|v| v.position)
            .collect();
        if live.is_empty() {
            return Vec::new();
        }
        let center = live.iter().sum::<DVec3>() / live.len() as f64;

        self.export_faces()
            .into_iter()
            .map(|[i, j, k]| {
                let (a, b, c) = (
                    self.vertices[i].position,
                    self.vertices[j].position,
                    self.vertices[k].position,
                );
                if orient3d(a, b, c, center) > 0.0 {
                    [i, k, j]
                } else {
                    [i, j, k]
                }
            })
            .collect()
    }

    /// Returns true if every edge is listed by both endpoints.
    pub fn is_symmetric(&self) -> bool {
        self.vertices.iter().enumerate().all(|(i, v)| {
            let id = VertexId::new(i);
            v.adjacency
                .iter()
                .all(|&n| n.index() < self.vertices.len() && self.is_adjacent(n, id))
        })
    }

    /// Checks the structural invariants of the adjacency graph.
    ///
    /// Every entry must name an in-range live slot other than its owner, no
    /// entry may repeat and every edge must be listed by both endpoints.
    pub fn validate(&self) -> HullResult<()> {
        let count = self.vertices.len();
        for (i, vertex) in self.vertices.iter().enumerate() {
            if !vertex.is_live() && !vertex.adjacency.is_empty() {
                return Err(HullError::malformed(
                    MergePhase::Validation,
                    i,
                    vertex.adjacency[0].index(),
                    "tombstoned vertex keeps edges",
                ));
            }
            let mut seen = Vec::with_capacity(vertex.adjacency.len());
            for &n in &vertex.adjacency {
                let j = n.index();
                let message = if j >= count {
                    Some("neighbour out of range")
                } else if j == i {
                    Some("self loop")
                } else if seen.contains(&j) {
                    Some("duplicate neighbour")
                } else if !self.vertices[j].is_live() {
                    Some("edge to tombstoned vertex")
                } else if !self.is_adjacent(n, VertexId::new(i)) {
                    Some("asymmetric edge")
                } else {
                    None
                };
                if let Some(message) = message {
                    return Err(HullError::malformed(MergePhase::Validation, i, j, message));
                }
                seen.push(j);
            }
        }
        Ok(())
    }
}

/// Intersection of two ascending index lists.
fn sorted_intersection(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(points: &[DVec3]) -> Mesh {
        let samples: Vec<Sample> = points.iter().copied().map(Sample::exact).collect();
        Mesh::leaf(&samples)
    }

    fn ids(indices: &[usize]) -> Vec<VertexId> {
        indices.iter().copied().map(VertexId::new).collect()
    }

    #[test]
    fn test_leaf_is_complete_graph_in_descending_order() {
        let mesh = leaf(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(mesh.neighbors(VertexId::new(0)), ids(&[2, 1]).as_slice());
        assert_eq!(mesh.neighbors(VertexId::new(1)), ids(&[2, 0]).as_slice());
        assert_eq!(mesh.neighbors(VertexId::new(2)), ids(&[1, 0]).as_slice());
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.is_symmetric());
    }

    #[test]
    fn test_leaf_aggregates() {
        let mesh = leaf(&[DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0), DVec3::new(0.0, 3.0, 0.0)]);
        assert_eq!(mesh.centroid(), DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.bounding_box().max, DVec3::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_triangle_leaf_has_one_face() {
        let mesh = leaf(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(mesh.export_faces(), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_segment_leaf_has_no_faces() {
        let mesh = leaf(&[DVec3::ZERO, DVec3::X]);
        assert!(mesh.export_faces().is_empty());
        assert!(mesh.is_adjacent(VertexId::new(0), VertexId::new(1)));
    }

    #[test]
    fn test_compact_renumbers_and_is_idempotent() {
        let mut mesh = leaf(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
        let middle = VertexId::new(1);
        for n in mesh.neighbors(middle).to_vec() {
            mesh.forget_neighbor(n, middle);
        }
        mesh.tombstone(middle);
        assert_eq!(mesh.slot_count(), 3);
        assert_eq!(mesh.live_count(), 2);

        mesh.compact();
        assert_eq!(mesh.slot_count(), 2);
        assert_eq!(mesh.vertex(VertexId::new(1)).position(), DVec3::Y);
        assert_eq!(mesh.neighbors(VertexId::new(0)), ids(&[1]).as_slice());

        let once = mesh.clone();
        mesh.compact();
        assert_eq!(mesh, once);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_absorb_shifts_indices() {
        let mut a = leaf(&[DVec3::ZERO, DVec3::X]);
        let b = leaf(&[DVec3::new(5.0, 0.0, 0.0), DVec3::new(5.0, 1.0, 0.0)]);
        let offset = a.absorb(b);
        assert_eq!(offset, 2);
        assert_eq!(a.neighbors(VertexId::new(2)), ids(&[3]).as_slice());
        assert_eq!(a.bounding_box().max.x, 5.0);
        assert_eq!(a.centroid(), DVec3::new(2.75, 0.25, 0.0));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_vertex_id_keeps_indices_past_u32() {
        let wide = u32::MAX as usize + 5;
        assert_eq!(VertexId::new(wide).index(), wide);
        assert_eq!(VertexId::new(u32::MAX as usize).shifted(7).index(), wide + 2);
        assert_ne!(VertexId::new(wide), VertexId::new(4));
    }

    #[test]
    fn test_connect_and_disconnect_are_symmetric() {
        let mut mesh = leaf(&[DVec3::ZERO, DVec3::X]);
        let (a, b) = (VertexId::new(0), VertexId::new(1));
        mesh.disconnect(a, b);
        assert_eq!(mesh.edge_count(), 0);
        mesh.connect(a, b);
        mesh.connect(b, a);
        assert_eq!(mesh.edge_count(), 1);
        assert!(mesh.is_symmetric());
    }

    #[test]
    fn test_validate_reports_asymmetric_edge() {
        let mut mesh = leaf(&[DVec3::ZERO, DVec3::X, DVec3::Y]);
        mesh.forget_neighbor(VertexId::new(2), VertexId::new(0));
        match mesh.validate() {
            Err(HullError::MalformedTopology { phase, a, b, .. }) => {
                assert_eq!(phase, MergePhase::Validation);
                assert_eq!((a, b), (0, 2));
            }
            other => panic!("expected malformed topology, got {other:?}"),
        }
        assert!(!mesh.is_symmetric());
    }

    #[test]
    fn test_export_faces_filters_separating_triangle() {
        // Two tetrahedra glued on triangle 0-1-2: edges of that triangle have
        // three common neighbours, only the outer apexes form faces.
        let points = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(1.0, 0.7, 1.0),
            DVec3::new(1.0, 0.7, -1.0),
        ];
        let mut mesh = leaf(&points[..3]);
        let apexes = leaf(&points[3..]);
        mesh.absorb(apexes);
        let (v3, v4) = (VertexId::new(3), VertexId::new(4));
        mesh.disconnect(v3, v4);
        for i in 0..3 {
            mesh.connect(VertexId::new(i), v3);
            mesh.connect(VertexId::new(i), v4);
        }

        let faces = mesh.export_faces();
        assert_eq!(faces.len(), 6);
        assert!(!faces.contains(&[0, 1, 2]));
    }

    #[test]
    fn test_sorted_intersection() {
        assert_eq!(sorted_intersection(&[1, 3, 5, 7], &[0, 3, 4, 7, 9]), vec![3, 7]);
        assert!(sorted_intersection(&[], &[1]).is_empty());
    }
}
