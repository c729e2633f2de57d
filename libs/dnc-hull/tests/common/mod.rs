//! Shared checks for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use config::constants::CONVEXITY_TOLERANCE;
use dnc_hull::{Mesh, VertexId};
use glam::DVec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The eight corners of the unit cube.
pub fn unit_cube() -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 1.0, 1.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 1.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(1.0, 1.0, 1.0),
    ]
}

/// L-shaped prism: two parallel six-point rings, each with one reflex corner.
pub fn l_prism() -> Vec<DVec3> {
    let ring = [
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ];
    [0.0, 1.0]
        .iter()
        .flat_map(|&z| ring.iter().map(move |&(x, y)| DVec3::new(x, y, z)))
        .collect()
}

/// Uniform points in `[-1, 1)^3`.
pub fn random_cloud(seed: u64, count: usize) -> Vec<DVec3> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            DVec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect()
}

/// Points on the unit sphere, every one of them a hull vertex.
pub fn sphere_cloud(seed: u64, count: usize) -> Vec<DVec3> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let v = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let length = v.length();
        if length > 0.1 && length <= 1.0 {
            points.push(v / length);
        }
    }
    points
}

fn tolerance(points: &[DVec3]) -> f64 {
    let (min, max) = points
        .iter()
        .fold((DVec3::splat(f64::MAX), DVec3::splat(f64::MIN)), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    CONVEXITY_TOLERANCE * (max - min).length().max(1.0)
}

/// Every edge borders exactly two faces and every face edge is an edge.
pub fn assert_closed_manifold(mesh: &Mesh) {
    let faces = mesh.export_faces();
    let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
    for &[i, j, k] in &faces {
        for edge in [(i, j), (i, k), (j, k)] {
            *uses.entry(edge).or_insert(0) += 1;
        }
    }
    for (i, vertex) in mesh.vertices().iter().enumerate() {
        for n in vertex.adjacency() {
            let edge = (i.min(n.index()), i.max(n.index()));
            assert_eq!(uses.get(&edge), Some(&2), "edge {edge:?} is not shared by two faces");
        }
    }
    for (edge, _) in uses {
        assert!(
            mesh.is_adjacent(VertexId::new(edge.0), VertexId::new(edge.1)),
            "face edge {edge:?} missing from adjacency"
        );
    }
}

/// V - E + F = 2.
pub fn assert_euler(mesh: &Mesh) {
    let v = mesh.live_count() as i64;
    let e = mesh.edge_count() as i64;
    let f = mesh.export_faces().len() as i64;
    assert_eq!(v - e + f, 2, "V={v} E={e} F={f}");
}

/// No input point lies strictly outside any face plane.
pub fn assert_convex_and_contains(mesh: &Mesh, points: &[DVec3]) {
    let tol = tolerance(points);
    let positions = mesh.positions();
    for [i, j, k] in mesh.oriented_faces() {
        let (a, b, c) = (positions[i], positions[j], positions[k]);
        let normal = (b - a).cross(c - a);
        assert!(normal.length() > 0.0, "degenerate face ({i}, {j}, {k})");
        let normal = normal.normalize();
        for p in points.iter().chain(&positions) {
            let distance = normal.dot(*p - a);
            assert!(distance <= tol, "point {p} is {distance} outside face ({i}, {j}, {k})");
        }
    }
}

/// Full structural and geometric check of a finished hull.
pub fn assert_valid_hull(mesh: &Mesh, points: &[DVec3]) {
    mesh.validate().unwrap();
    assert!(mesh.is_symmetric());
    assert_closed_manifold(mesh);
    assert_euler(mesh);
    assert_convex_and_contains(mesh, points);
}
