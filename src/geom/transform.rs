//! Rigid transforms (rotation + translation, no scale or shear).

use glam::{DAffine3, DMat3, DQuat, DVec3};

use super::{Point3, Vector3};
use crate::consts::{RIGID_TOLERANCE, SAME_TRANSFORM_PRECISION};
use crate::error::{CadboxError, Result};
use crate::obb::OrientedBox;

/// An affine transform whose linear part is a proper rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    affine: DAffine3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        affine: DAffine3::IDENTITY,
    };

    /// Accept `affine` only if its linear part is orthonormal with determinant +1.
    pub fn try_from_affine(affine: DAffine3) -> Result<Self> {
        let deviation = rigidity_deviation(affine.matrix3);
        if !(deviation <= RIGID_TOLERANCE) {
            return Err(CadboxError::NonRigidTransform { deviation });
        }
        Ok(Self { affine })
    }

    pub fn from_rotation_translation(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            affine: DAffine3::from_rotation_translation(rotation.normalize(), translation),
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            affine: DAffine3::from_translation(translation),
        }
    }

    pub fn from_axis_angle(axis: DVec3, angle: f64) -> Self {
        Self::from_rotation_translation(
            DQuat::from_axis_angle(axis.normalize(), angle),
            DVec3::ZERO,
        )
    }

    /// Placement of a box frame: local origin to `center`, local axes to the box axes.
    pub fn placement_of(bbox: &OrientedBox) -> Self {
        let [x, y, z] = bbox.axes;
        Self {
            affine: DAffine3::from_mat3_translation(DMat3::from_cols(x, y, z), bbox.center),
        }
    }

    /// World-to-box transform: the box becomes axis aligned and centered at the origin.
    pub fn local_frame_of(bbox: &OrientedBox) -> Self {
        Self::placement_of(bbox).inverse()
    }

    /// Inverse computed with the rotation transpose.
    pub fn inverse(&self) -> Self {
        let rot_t = self.affine.matrix3.transpose();
        Self {
            affine: DAffine3::from_mat3_translation(rot_t, -(rot_t * self.affine.translation)),
        }
    }

    /// `self` applied after `first`.
    pub fn then_after(&self, first: &RigidTransform) -> Self {
        Self {
            affine: self.affine * first.affine,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.affine.transform_point3(p)
    }

    #[inline]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.affine.transform_vector3(v)
    }

    pub fn rotation(&self) -> DMat3 {
        self.affine.matrix3
    }

    pub fn translation(&self) -> DVec3 {
        self.affine.translation
    }

    pub fn as_affine(&self) -> DAffine3 {
        self.affine
    }

    /// Element-wise comparison of the 3x4 matrices.
    pub fn approx_eq(&self, other: &RigidTransform, precision: f64) -> bool {
        self.affine.abs_diff_eq(other.affine, precision)
    }

    /// [`RigidTransform::approx_eq`] with the default precision.
    pub fn same_as(&self, other: &RigidTransform) -> bool {
        self.approx_eq(other, SAME_TRANSFORM_PRECISION)
    }
}

impl TryFrom<DAffine3> for RigidTransform {
    type Error = CadboxError;

    fn try_from(affine: DAffine3) -> Result<Self> {
        Self::try_from_affine(affine)
    }
}

/// Largest deviation of `m` from a proper rotation.
fn rigidity_deviation(m: DMat3) -> f64 {
    let gram = m.transpose() * m;
    let ortho = (gram - DMat3::IDENTITY)
        .to_cols_array()
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let det = (m.determinant() - 1.0).abs();
    ortho.max(det)
}
