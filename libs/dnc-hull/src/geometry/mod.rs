//! # Geometry Primitives
//!
//! Vector helpers and predicates shared by the builder, the merger and the
//! exporter. Points are `glam::DVec3`; orientation signs come from the
//! `robust` crate's adaptive-precision predicates so that every caller sees
//! the same answer for the same four points.

mod bounds;


pub use bounds::BoundingBox;
pub use glam::DVec3;

use robust::{Coord, Coord3D};

#[inline]
fn coord3(p: DVec3) -> Coord3D<f64> {
    Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

/// Signed volume test for four points.
///
/// Positive when `s` lies on the side of the plane `(p, q, r)` that the
/// normal `(q - p) × (r - p)` points to, negative on the other side and zero
/// when the four points are coplanar.
///
/// # Example
///
/// ```rust
/// use dnc_hull::geometry::{orient3d, DVec3};
///
/// let above = orient3d(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
/// assert!(above > 0.0);
/// ```
#[inline]
pub fn orient3d(p: DVec3, q: DVec3, r: DVec3, s: DVec3) -> f64 {
    -robust::orient3d(coord3(p), coord3(q), coord3(r), coord3(s))
}

/// Planar orientation of three points given as `(x, y)` pairs.
///
/// Positive when `p, q, r` turn counter-clockwise.
#[inline]
pub fn orient2d(p: [f64; 2], q: [f64; 2], r: [f64; 2]) -> f64 {
    robust::orient2d(
        Coord { x: p[0], y: p[1] },
        Coord { x: q[0], y: q[1] },
        Coord { x: r[0], y: r[1] },
    )
}

/// Unsigned angle between two vectors in `[0, π]`.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
/// vectors where `acos` loses precision.
///
/// # Example
///
/// ```rust
/// use dnc_hull::geometry::{angle_between, DVec3};
///
/// let right = angle_between(DVec3::X, DVec3::Y);
/// assert!((right - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Component of `p - origin` orthogonal to the unit vector `axis`.
#[inline]
pub fn project_perpendicular(origin: DVec3, axis: DVec3, p: DVec3) -> DVec3 {
    let r = p - origin;
    r - axis * r.dot(axis)
}

/// Unit direction of the edge `from -> to`, or zero for a degenerate edge.
#[inline]
pub fn edge_axis(from: DVec3, to: DVec3) -> DVec3 {
    (to - from).normalize_or_zero()
}

/// Keeps the two candidates that span the widest angle around an edge.
///
/// Candidates are the apexes of triangles hinged on the edge
/// `origin -> end`. Each is projected onto the plane orthogonal to the edge
/// and compared by angular position. The first two candidates start as the
/// kept pair; a later candidate replaces one of them only when its angle to
/// the *other* kept vertex is larger than both its angle to the replaced
/// vertex and the angle between the current pair.
///
/// Returns at most two keys, in kept order.
///
/// # Example
///
/// ```rust
/// use dnc_hull::geometry::{angular_extremes, DVec3};
///
/// // Edge along Z; apexes spread around it.
/// let kept = angular_extremes(
///     DVec3::ZERO,
///     DVec3::Z,
///     &[
///         (0, DVec3::new(1.0, 0.0, 0.5)),
///         (1, DVec3::new(1.0, 1.0, 0.5)),
///         (2, DVec3::new(-1.0, 0.1, 0.5)),
///     ],
/// );
/// assert_eq!(kept, vec![0, 2]);
/// ```
pub fn angular_extremes<T: Copy>(origin: DVec3, end: DVec3, candidates: &[(T, DVec3)]) -> Vec<T> {
    let axis = edge_axis(origin, end);
    let mut kept: Vec<(T, DVec3)> = candidates.iter().take(2).copied().collect();

    for &(key, position) in candidates.iter().skip(2) {
        let a0 = project_perpendicular(origin, axis, kept[0].1);
        let a1 = project_perpendicular(origin, axis, kept[1].1);
        let other = project_perpendicular(origin, axis, position);

        let reference = angle_between(a0, a1);
        let to_first = angle_between(a0, other);
        let to_second = angle_between(a1, other);

        if to_first > to_second && to_first > reference {
            kept[1] = (key, position);
        } else if to_second > to_first && to_second > reference {
            kept[0] = (key, position);
        }
    }

    kept.into_iter().map(|(key, _)| key).collect()
}
