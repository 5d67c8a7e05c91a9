//! Triangle fragments produced by face triangulation.

use glam::DVec3;

use super::{Point3, RigidTransform, Vector3};
use crate::error::{CadboxError, Result};

/// Three vertices of one triangulated face fragment.
///
/// Fields are read-only outside the crate so a checked triangle stays checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub(crate) p0: Point3,
    pub(crate) p1: Point3,
    pub(crate) p2: Point3,
}

impl Triangle {
    /// Build a triangle, rejecting it when two vertices lie within `tolerance`.
    pub fn new(p0: Point3, p1: Point3, p2: Point3, tolerance: f64) -> Result<Self> {
        Self::try_new(p0, p1, p2, tolerance)
            .ok_or_else(|| CadboxError::degenerate("triangle vertices coincide"))
    }

    /// Like [`Triangle::new`] but returns `None` for degenerate input.
    pub fn try_new(p0: Point3, p1: Point3, p2: Point3, tolerance: f64) -> Option<Self> {
        if Self::is_degenerate(p0, p1, p2, tolerance) {
            None
        } else {
            Some(Self { p0, p1, p2 })
        }
    }

    /// Wrap three points without the coincidence check.
    ///
    /// Only for separating-axis queries, which accept any triangle including
    /// slivers and points. Index fragments and mesh triangles always go
    /// through [`Triangle::try_new`].
    pub const fn from_points_unchecked(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self { p0, p1, p2 }
    }

    /// True when any two of the points are within `tolerance` of each other.
    pub fn is_degenerate(p0: Point3, p1: Point3, p2: Point3, tolerance: f64) -> bool {
        p0.distance(p1) <= tolerance || p0.distance(p2) <= tolerance || p1.distance(p2) <= tolerance
    }

    #[inline]
    pub fn vertices(&self) -> [Point3; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// Edge vectors `p1-p0`, `p2-p1`, `p0-p2`.
    #[inline]
    pub fn edges(&self) -> [Vector3; 3] {
        [self.p1 - self.p0, self.p2 - self.p1, self.p0 - self.p2]
    }

    /// Unnormalized face normal.
    #[inline]
    pub fn normal(&self) -> Vector3 {
        (self.p1 - self.p0).cross(self.p2 - self.p1)
    }

    pub fn area(&self) -> f64 {
        0.5 * self.normal().length()
    }

    pub fn centroid(&self) -> Point3 {
        (self.p0 + self.p1 + self.p2) / 3.0
    }

    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            p0: transform.transform_point(self.p0),
            p1: transform.transform_point(self.p1),
            p2: transform.transform_point(self.p2),
        }
    }

    /// Translate every vertex by `offset`.
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            p0: self.p0 + offset,
            p1: self.p1 + offset,
            p2: self.p2 + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_rejected() {
        let a = DVec3::ZERO;
        let b = DVec3::new(0.005, 0.0, 0.0);
        let c = DVec3::new(0.0, 1.0, 0.0);
        assert!(Triangle::try_new(a, b, c, 0.01).is_none());
        assert!(Triangle::new(a, b, c, 0.01).is_err());
        // Same points pass with the finer whole-shape tolerance.
        assert!(Triangle::try_new(a, b, c, 0.0001).is_some());
    }

    #[test]
    fn test_area_and_normal() {
        let tri = Triangle::from_points_unchecked(DVec3::ZERO, DVec3::X * 2.0, DVec3::Y * 2.0);
        assert!((tri.area() - 2.0).abs() < 1e-12);
        assert!(tri.normal().normalize().abs_diff_eq(DVec3::Z, 1e-12));
    }

    #[test]
    fn test_edges_close_loop() {
        let tri = Triangle::from_points_unchecked(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-1.0, 0.5, 2.0),
            DVec3::new(4.0, 4.0, -1.0),
        );
        let [e0, e1, e2] = tri.edges();
        assert!((e0 + e1 + e2).length() < 1e-12);
    }
}
