//! Geometry primitives
//!
//! Points and vectors are plain `glam::DVec3` values. This module adds the
//! triangle fragment type, rigid transforms and axis-aligned boxes.

mod aabb;
mod transform;
mod triangle;

pub use aabb::Aabb;
pub use transform::RigidTransform;
pub use triangle::Triangle;

use glam::DVec3;

use crate::consts::NORMALIZE_EPSILON;
use crate::error::{CadboxError, Result};

/// A location in world space.
pub type Point3 = DVec3;

/// A direction or displacement in world space.
pub type Vector3 = DVec3;

/// Normalize `v`, failing when it has no usable direction.
pub fn unit(v: Vector3) -> Result<Vector3> {
    let len = v.length();
    if !len.is_finite() || len < NORMALIZE_EPSILON {
        return Err(CadboxError::degenerate("zero-length direction"));
    }
    Ok(v / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_normalizes() {
        let v = unit(DVec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v - DVec3::new(0.6, 0.0, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_unit_rejects_zero() {
        assert!(matches!(
            unit(DVec3::ZERO),
            Err(CadboxError::DegenerateInput { .. })
        ));
        assert!(unit(DVec3::splat(1e-14)).is_err());
        assert!(unit(DVec3::new(f64::NAN, 0.0, 0.0)).is_err());
    }
}
