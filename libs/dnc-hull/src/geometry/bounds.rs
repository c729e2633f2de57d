//! Axis-aligned bounding box.

use glam::DVec3;

/// Axis-aligned bounding box tracked incrementally.
///
/// An empty box has `min > max` on every axis and absorbs the first point
/// extended into it.
///
/// # Example
///
/// ```rust
/// use dnc_hull::geometry::{BoundingBox, DVec3};
///
/// let mut bounds = BoundingBox::empty();
/// bounds.extend(DVec3::new(0.0, 0.0, 0.0));
/// bounds.extend(DVec3::new(4.0, 1.0, 2.0));
/// assert_eq!(bounds.longest_axis(), 0);
/// assert_eq!(bounds.midpoint(), DVec3::new(2.0, 0.5, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates a box containing nothing.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Creates the smallest box containing all `points`.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Self {
        let mut bounds = Self::empty();
        bounds.extend_all(points);
        bounds
    }

    /// Returns true if no point has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Grows the box to contain `point`.
    #[inline]
    pub fn extend(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows the box to contain every point of `points`.
    pub fn extend_all<I: IntoIterator<Item = DVec3>>(&mut self, points: I) {
        for point in points {
            self.extend(point);
        }
    }

    /// Grows the box to contain `other`.
    #[inline]
    pub fn union(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.extend(other.min);
            self.extend(other.max);
        }
    }

    /// Center of the box.
    #[inline]
    pub fn midpoint(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis, zero for an empty box.
    #[inline]
    pub fn extent(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Length of the box diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.extent().length()
    }

    /// Axis of greatest extent; ties resolve to the lowest axis.
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();
        let mut axis = 0;
        for k in 1..3 {
            if extent[k] > extent[axis] {
                axis = k;
            }
        }
        axis
    }
}

impl FromIterator<DVec3> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = DVec3>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
