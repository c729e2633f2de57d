use super::prune::{ring_steps, Nominations};
use super::walk::equator_walk;
use super::weld::remove_internal_links;
use super::*;
use crate::build::build;
use crate::error::{HullError, MergePhase};
use crate::mesh::Sample;
use glam::DVec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// =========================================================================
// Fixtures
// =========================================================================

fn leaf(points: &[[f64; 3]]) -> Mesh {
    let samples: Vec<Sample> = points
        .iter()
        .map(|&p| Sample::exact(DVec3::from_array(p)))
        .collect();
    Mesh::leaf(&samples)
}

fn left_triangle() -> Mesh {
    leaf(&[[0.0, 0.0, 0.0], [0.0, 2.0, 0.3], [0.2, 0.5, 2.0]])
}

fn right_triangle() -> Mesh {
    leaf(&[[3.0, 0.1, 0.2], [3.2, 1.9, 0.1], [2.9, 1.0, 1.8]])
}

fn split_x(value: f64) -> SplitPlane {
    SplitPlane { axis: 0, value }
}

fn b(lower: usize, upper: usize) -> Bridge {
    Bridge::new(VertexId::new(lower), VertexId::new(upper))
}

fn face_count(mesh: &Mesh) -> usize {
    mesh.export_faces().len()
}

// =========================================================================
// Bridges
// =========================================================================

#[test]
fn test_bridge_get_and_with() {
    let bridge = b(1, 4);
    assert_eq!(bridge.get(Side::Lower), VertexId::new(1));
    assert_eq!(bridge.get(Side::Upper), VertexId::new(4));
    assert_eq!(bridge.with(Side::Lower, VertexId::new(2)), b(2, 4));
    assert_eq!(bridge.with(Side::Upper, VertexId::new(0)), b(1, 0));
    assert_eq!(Side::Lower.other(), Side::Upper);
}

// =========================================================================
// Seed and walk
// =========================================================================

#[test]
fn test_walk_closes_ring_between_triangles() {
    let (lower, upper) = (left_triangle(), right_triangle());
    let evaluator = Evaluator::new(&lower, &upper, split_x(1.5));
    let seed = evaluator.seed_bridge(&lower, &upper).unwrap();
    let ring = equator_walk(&lower, &upper, seed, 100).unwrap();

    assert_eq!(ring[0], seed);
    assert_eq!(ring.len(), 6);
    for (k, &next) in ring.iter().enumerate() {
        let prev = ring[(k + ring.len() - 1) % ring.len()];
        let shared = (prev.lower == next.lower) as u8 + (prev.upper == next.upper) as u8;
        assert_eq!(shared, 1, "{prev:?} -> {next:?}");
    }
}

#[test]
fn test_seed_bridge_is_edge_of_merged_hull() {
    for seed in 0..40 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut points: Vec<DVec3> = (0..40)
            .map(|_| {
                DVec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
            })
            .collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        let lower = build(&points[..20]).unwrap();
        let upper = build(&points[20..]).unwrap();

        let max_lower = (0..lower.slot_count())
            .map(|i| lower.working(VertexId::new(i)).x)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_upper = (0..upper.slot_count())
            .map(|i| upper.working(VertexId::new(i)).x)
            .fold(f64::INFINITY, f64::min);
        let split = split_x(0.5 * (max_lower + min_upper));

        let bridge = Evaluator::new(&lower, &upper, split)
            .seed_bridge(&lower, &upper)
            .unwrap();
        let ends = (
            lower.vertex(bridge.lower).position(),
            upper.vertex(bridge.upper).position(),
        );

        let hull = Merger::default().merge(lower, upper, split).unwrap();
        let positions = hull.positions();
        let find = |p: DVec3| positions.iter().position(|&q| q == p).map(VertexId::new);
        match (find(ends.0), find(ends.1)) {
            (Some(a), Some(b)) => assert!(hull.is_adjacent(a, b), "seed {seed}: bridge not an edge"),
            _ => panic!("seed {seed}: bridge endpoint removed"),
        }
    }
}

#[test]
fn test_walk_of_two_points_is_single_bridge() {
    let (lower, upper) = (leaf(&[[0.0, 0.0, 0.0]]), leaf(&[[1.0, 0.0, 0.0]]));
    let ring = equator_walk(&lower, &upper, b(0, 0), 10).unwrap();
    assert_eq!(ring, vec![b(0, 0)]);
}

#[test]
fn test_walk_limit_is_reported() {
    let (lower, upper) = (left_triangle(), right_triangle());
    let err = equator_walk(&lower, &upper, b(0, 0), 0).unwrap_err();
    assert!(matches!(
        err,
        HullError::MalformedTopology {
            phase: MergePhase::EquatorWalk,
            ..
        }
    ));
}

// =========================================================================
// Ring steps
// =========================================================================

#[test]
fn test_ring_steps_split_by_moving_side() {
    let ring = [b(0, 0), b(2, 0), b(2, 2), b(1, 2), b(1, 1), b(0, 1)];
    let [lower, upper] = ring_steps(&ring).unwrap();
    assert_eq!(lower.len(), 3);
    assert_eq!(upper.len(), 3);
    assert_eq!(lower[0].from, VertexId::new(0));
    assert_eq!(lower[0].to, VertexId::new(2));
    assert_eq!(lower[0].pivot, VertexId::new(0));
    // The wrap from the last bridge back to the first moves the upper side.
    assert!(upper
        .iter()
        .any(|s| s.from == VertexId::new(1) && s.to == VertexId::new(0)));
}

#[test]
fn test_ring_steps_reject_disjoint_bridges() {
    let err = ring_steps(&[b(0, 0), b(1, 1)]).unwrap_err();
    assert!(matches!(
        err,
        HullError::MalformedTopology {
            phase: MergePhase::InteriorPruning,
            ..
        }
    ));
}

#[test]
fn test_ring_steps_of_single_bridge_are_empty() {
    let [lower, upper] = ring_steps(&[b(0, 0)]).unwrap();
    assert!(lower.is_empty() && upper.is_empty());
}

// =========================================================================
// Weld
// =========================================================================

#[test]
fn test_remove_internal_links_needs_two_nominations() {
    let mut mesh = left_triangle();
    let mut lower = Nominations::new();
    lower.insert((VertexId::new(0), VertexId::new(1)), 2);
    lower.insert((VertexId::new(1), VertexId::new(2)), 1);
    remove_internal_links(&mut mesh, &[lower, Nominations::new()], 3);

    assert!(!mesh.is_adjacent(VertexId::new(0), VertexId::new(1)));
    assert!(mesh.is_adjacent(VertexId::new(1), VertexId::new(2)));
    assert!(mesh.is_symmetric());
}

// =========================================================================
// Full merges
// =========================================================================

#[test]
fn test_merge_triangles_gives_octahedral_hull() {
    let hull = Merger::default()
        .merge(left_triangle(), right_triangle(), split_x(1.5))
        .unwrap();
    assert_eq!(hull.live_count(), 6);
    assert_eq!(hull.slot_count(), 6);
    assert_eq!(hull.edge_count(), 12);
    assert_eq!(face_count(&hull), 8);
    hull.validate().unwrap();
}

#[test]
fn test_merge_two_segments_gives_tetrahedron() {
    let lower = leaf(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let upper = leaf(&[[1.0, 0.0, 1.0], [1.0, 1.2, -0.5]]);
    let hull = merge(lower, upper, 0, 0.5).unwrap();
    assert_eq!(hull.live_count(), 4);
    assert_eq!(hull.edge_count(), 6);
    assert_eq!(face_count(&hull), 4);
}

#[test]
fn test_merge_triangle_and_point() {
    let hull = merge(left_triangle(), leaf(&[[2.0, 1.0, 1.0]]), 0, 1.0).unwrap();
    assert_eq!(hull.live_count(), 4);
    assert_eq!(face_count(&hull), 4);
    hull.validate().unwrap();
}

#[test]
fn test_merge_two_points_gives_segment() {
    let hull = merge(leaf(&[[0.0, 0.0, 0.0]]), leaf(&[[1.0, 0.0, 0.0]]), 0, 0.5).unwrap();
    assert_eq!(hull.live_count(), 2);
    assert!(hull.is_adjacent(VertexId::new(0), VertexId::new(1)));
    assert_eq!(face_count(&hull), 0);
}

#[test]
fn test_merge_with_empty_operand_returns_other() {
    let hull = merge(Mesh::new(), right_triangle(), 0, 1.5).unwrap();
    assert_eq!(hull.live_count(), 3);
    let hull = merge(left_triangle(), Mesh::new(), 0, 1.5).unwrap();
    assert_eq!(hull.live_count(), 3);
}
