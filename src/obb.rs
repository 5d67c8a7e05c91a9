//! Oriented bounding box value type.

use glam::{DAffine3, DVec3};

use crate::consts::ORTHONORMAL_TOLERANCE;
use crate::error::{CadboxError, Result};
use crate::geom::{Aabb, Point3, RigidTransform, Vector3};

/// A box aligned to an arbitrary orthonormal, right-handed frame.
///
/// Fields are read-only outside the crate; every public way to make a box
/// keeps the frame orthonormal and the half sizes non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub(crate) center: Point3,
    /// Unit local X, Y and Z axes.
    pub(crate) axes: [Vector3; 3],
    /// Non-negative half extents along `axes`.
    pub(crate) half_sizes: DVec3,
}

impl OrientedBox {
    /// Build a box, checking the frame and half-size invariants.
    pub fn new(center: Point3, axes: [Vector3; 3], half_sizes: DVec3) -> Result<Self> {
        if !center.is_finite() || !half_sizes.is_finite() {
            return Err(CadboxError::degenerate("non-finite box component"));
        }
        if half_sizes.min_element() < 0.0 {
            return Err(CadboxError::degenerate("negative half size"));
        }
        let bbox = Self {
            center,
            axes,
            half_sizes,
        };
        if !bbox.is_orthonormal(ORTHONORMAL_TOLERANCE) {
            return Err(CadboxError::degenerate("box axes are not orthonormal"));
        }
        if axes[0].cross(axes[1]).dot(axes[2]) < 0.0 {
            return Err(CadboxError::degenerate("box axes are left-handed"));
        }
        Ok(bbox)
    }

    /// A box aligned to the world axes.
    pub fn axis_aligned(center: Point3, half_sizes: DVec3) -> Self {
        Self {
            center,
            axes: [DVec3::X, DVec3::Y, DVec3::Z],
            half_sizes: half_sizes.abs(),
        }
    }

    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::axis_aligned(aabb.center(), aabb.size() * 0.5)
    }

    #[inline]
    pub fn center(&self) -> Point3 {
        self.center
    }

    #[inline]
    pub fn axes(&self) -> [Vector3; 3] {
        self.axes
    }

    #[inline]
    pub fn half_sizes(&self) -> DVec3 {
        self.half_sizes
    }

    #[inline]
    pub fn x_axis(&self) -> Vector3 {
        self.axes[0]
    }

    #[inline]
    pub fn y_axis(&self) -> Vector3 {
        self.axes[1]
    }

    #[inline]
    pub fn z_axis(&self) -> Vector3 {
        self.axes[2]
    }

    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let [x, y, z] = self.axes;
        (x.length() - 1.0).abs() <= tolerance
            && (y.length() - 1.0).abs() <= tolerance
            && (z.length() - 1.0).abs() <= tolerance
            && x.dot(y).abs() <= tolerance
            && y.dot(z).abs() <= tolerance
            && x.dot(z).abs() <= tolerance
    }

    /// Corner `index` in `0..8`; bit 0 picks +X, bit 1 +Y, bit 2 +Z.
    pub fn corner(&self, index: usize) -> Point3 {
        let sign = |bit: usize| if index & bit == 0 { -1.0 } else { 1.0 };
        self.center
            + self.axes[0] * (sign(1) * self.half_sizes.x)
            + self.axes[1] * (sign(2) * self.half_sizes.y)
            + self.axes[2] * (sign(4) * self.half_sizes.z)
    }

    pub fn corners(&self) -> [Point3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }

    /// Coordinates of `p` in the box frame.
    #[inline]
    pub fn to_local(&self, p: Point3) -> DVec3 {
        let d = p - self.center;
        DVec3::new(d.dot(self.axes[0]), d.dot(self.axes[1]), d.dot(self.axes[2]))
    }

    /// True when `p` lies inside the box or within `tolerance` of its boundary.
    pub fn contains_point(&self, p: Point3, tolerance: f64) -> bool {
        let local = self.to_local(p).abs();
        local.cmple(self.half_sizes + DVec3::splat(tolerance)).all()
    }

    pub fn contains_box(&self, other: &OrientedBox, tolerance: f64) -> bool {
        other
            .corners()
            .iter()
            .all(|&c| self.contains_point(c, tolerance))
    }

    /// Half length of the box projected on `axis` (scaled by `|axis|`).
    #[inline]
    pub fn projection_radius(&self, axis: Vector3) -> f64 {
        self.half_sizes.x * self.axes[0].dot(axis).abs()
            + self.half_sizes.y * self.axes[1].dot(axis).abs()
            + self.half_sizes.z * self.axes[2].dot(axis).abs()
    }

    /// Copy with the same frame and new half sizes.
    pub fn with_half_sizes(&self, half_sizes: DVec3) -> Result<Self> {
        Self::new(self.center, self.axes, half_sizes)
    }

    /// Copy with every half size grown by `margin`.
    pub fn enlarged(&self, margin: f64) -> Self {
        Self {
            half_sizes: self.half_sizes + DVec3::splat(margin),
            ..*self
        }
    }

    /// Copy moved by a rigid transform; half sizes are unchanged.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            center: transform.transform_point(self.center),
            axes: self.axes.map(|a| transform.transform_vector(a)),
            half_sizes: self.half_sizes,
        }
    }

    /// [`OrientedBox::transformed`] for an arbitrary affine, rejecting scale and shear.
    pub fn try_transform(&self, affine: DAffine3) -> Result<Self> {
        let rigid = RigidTransform::try_from_affine(affine)?;
        Ok(self.transformed(&rigid))
    }

    /// Full extents (twice the half sizes).
    pub fn size(&self) -> DVec3 {
        self.half_sizes * 2.0
    }

    pub fn volume(&self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Surface area of the rectangular prism.
    pub fn prism_area(&self) -> f64 {
        let s = self.size();
        2.0 * (s.x * s.y + s.x * s.z + s.y * s.z)
    }

    /// World axis-aligned box enclosing this box.
    pub fn aabb(&self) -> Aabb {
        let extent = self.axes[0].abs() * self.half_sizes.x
            + self.axes[1].abs() * self.half_sizes.y
            + self.axes[2].abs() * self.half_sizes.z;
        Aabb::new(self.center - extent, self.center + extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn rotated_box() -> OrientedBox {
        let t = RigidTransform::from_rotation_translation(
            DQuat::from_euler(glam::EulerRot::ZYX, 0.4, 0.9, -0.3),
            DVec3::new(2.0, -1.0, 5.0),
        );
        OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)).transformed(&t)
    }

    #[test]
    fn test_new_validates_frame() {
        let ok = OrientedBox::new(DVec3::ZERO, [DVec3::X, DVec3::Y, DVec3::Z], DVec3::ONE);
        assert!(ok.is_ok());

        let skewed = OrientedBox::new(
            DVec3::ZERO,
            [DVec3::X, DVec3::new(0.1, 1.0, 0.0), DVec3::Z],
            DVec3::ONE,
        );
        assert!(skewed.is_err());

        let left = OrientedBox::new(DVec3::ZERO, [DVec3::Y, DVec3::X, DVec3::Z], DVec3::ONE);
        assert!(left.is_err());

        let negative = OrientedBox::new(
            DVec3::ZERO,
            [DVec3::X, DVec3::Y, DVec3::Z],
            DVec3::new(1.0, -1.0, 1.0),
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_with_half_sizes_keeps_frame() {
        let b = rotated_box();
        let shrunk = b.with_half_sizes(b.half_sizes() * 0.5).unwrap();
        assert_eq!(shrunk.center(), b.center());
        assert_eq!(shrunk.axes(), b.axes());
        assert_eq!(shrunk.half_sizes(), DVec3::new(0.5, 1.0, 1.5));
        assert!(b.with_half_sizes(DVec3::new(1.0, -0.1, 1.0)).is_err());
        assert!(b.with_half_sizes(DVec3::splat(f64::NAN)).is_err());
    }

    #[test]
    fn test_corners_follow_sign_bits() {
        let b = OrientedBox::axis_aligned(DVec3::new(1.0, 1.0, 1.0), DVec3::new(1.0, 2.0, 3.0));
        let c = b.corners();
        assert_eq!(c[0], DVec3::new(0.0, -1.0, -2.0));
        assert_eq!(c[1], DVec3::new(2.0, -1.0, -2.0));
        assert_eq!(c[2], DVec3::new(0.0, 3.0, -2.0));
        assert_eq!(c[7], DVec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_enlarge_is_monotonic() {
        let b = rotated_box();
        for m in [0.0, 0.001, 0.5, 3.0] {
            let e = b.enlarged(m);
            assert!((e.half_sizes.x - (b.half_sizes.x + m)).abs() < 1e-12);
            assert!((e.half_sizes.y - (b.half_sizes.y + m)).abs() < 1e-12);
            assert!((e.half_sizes.z - (b.half_sizes.z + m)).abs() < 1e-12);
            assert!(e.contains_box(&b, 1e-9));
        }
    }

    #[test]
    fn test_transform_keeps_orthonormal() {
        let b = rotated_box();
        assert!(b.is_orthonormal(1e-7));
        assert_eq!(b.half_sizes, DVec3::new(1.0, 2.0, 3.0));
        for c in b.corners() {
            assert!(b.contains_point(c, 1e-9));
        }
    }

    #[test]
    fn test_try_transform_rejects_scale() {
        let b = rotated_box();
        assert!(matches!(
            b.try_transform(DAffine3::from_scale(DVec3::splat(2.0))),
            Err(CadboxError::NonRigidTransform { .. })
        ));
        assert!(b.try_transform(DAffine3::from_translation(DVec3::X)).is_ok());
    }

    #[test]
    fn test_aabb_encloses_corners() {
        let b = rotated_box();
        let aabb = b.aabb();
        for c in b.corners() {
            assert!(aabb.contains(c + (aabb.center() - c) * 1e-12));
        }
    }

    #[test]
    fn test_prism_area_and_volume() {
        let b = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        assert!((b.volume() - 48.0).abs() < 1e-12);
        assert!((b.prism_area() - 2.0 * (8.0 + 12.0 + 24.0)).abs() < 1e-12);
    }
}
