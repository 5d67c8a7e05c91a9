//! Oriented box construction from point clouds.
//!
//! Boxes are fitted with principal component analysis: the box frame is the
//! eigenbasis of the point covariance matrix and the extents are the
//! projected ranges of the points along that basis.

use glam::DVec3;

use crate::consts::DISTINCT_POINT_TOLERANCE;
use crate::error::{CadboxError, Result};
use crate::geom::Point3;
use crate::obb::OrientedBox;

const MAX_JACOBI_SWEEPS: usize = 32;

/// Builds oriented boxes from points or from other boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxBuilder;

impl BoxBuilder {
    /// Fit a box that encloses every point.
    ///
    /// Fails with `DegenerateInput` unless at least two distinct finite
    /// points are given.
    pub fn build_from_points(points: &[Point3]) -> Result<OrientedBox> {
        let first = *points
            .first()
            .ok_or_else(|| CadboxError::degenerate("no points"))?;
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CadboxError::degenerate("non-finite point"));
        }
        if !points
            .iter()
            .any(|p| p.distance(first) > DISTINCT_POINT_TOLERANCE)
        {
            return Err(CadboxError::degenerate("fewer than two distinct points"));
        }

        let n = points.len() as f64;
        let mean = points.iter().copied().sum::<DVec3>() / n;

        let mut cov = [[0.0f64; 3]; 3];
        for p in points {
            let d = (*p - mean).to_array();
            for (r, row) in cov.iter_mut().enumerate() {
                for (c, v) in row.iter_mut().enumerate() {
                    *v += d[r] * d[c];
                }
            }
        }
        for row in cov.iter_mut() {
            for v in row.iter_mut() {
                *v /= n;
            }
        }

        let axes = principal_axes(cov);

        let mut lo = DVec3::splat(f64::MAX);
        let mut hi = DVec3::splat(f64::MIN);
        for p in points {
            let d = *p - mean;
            let proj = DVec3::new(d.dot(axes[0]), d.dot(axes[1]), d.dot(axes[2]));
            lo = lo.min(proj);
            hi = hi.max(proj);
        }
        let mid = (lo + hi) * 0.5;
        let center = mean + axes[0] * mid.x + axes[1] * mid.y + axes[2] * mid.z;
        let half_sizes = (hi - lo) * 0.5;

        tracing::debug!(
            points = points.len(),
            ?center,
            ?half_sizes,
            "fitted oriented box"
        );

        Ok(OrientedBox {
            center,
            axes,
            half_sizes,
        })
    }

    /// Fit one box around the corners of several boxes.
    pub fn build_from_shape_union(boxes: &[OrientedBox]) -> Result<OrientedBox> {
        if boxes.is_empty() {
            return Err(CadboxError::degenerate("no boxes to merge"));
        }
        let corners: Vec<Point3> = boxes.iter().flat_map(|b| b.corners()).collect();
        Self::build_from_points(&corners)
    }
}

/// Orthonormal right-handed eigenbasis of a symmetric 3x3 matrix, ordered
/// by descending eigenvalue.
fn principal_axes(cov: [[f64; 3]; 3]) -> [DVec3; 3] {
    let (values, vectors) = jacobi_eigen(cov);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let column = |i: usize| DVec3::new(vectors[0][i], vectors[1][i], vectors[2][i]);
    let x = column(order[0]).normalize();
    let y = (column(order[1]) - x * x.dot(column(order[1]))).normalize();
    let z = x.cross(y);
    [x, y, z]
}

/// Cyclic Jacobi eigen-decomposition. Eigenvectors are the columns of the
/// returned matrix.
fn jacobi_eigen(mut a: [[f64; 3]; 3]) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum();
    if scale == 0.0 {
        return ([0.0; 3], v);
    }

    for _ in 0..MAX_JACOBI_SWEEPS {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        if off <= scale * 1e-30 {
            break;
        }

        for (p, q) in [(0usize, 1usize), (0, 2), (1, 2)] {
            if a[p][q].abs() <= f64::MIN_POSITIVE {
                continue;
            }
            let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            for row in a.iter_mut() {
                let (akp, akq) = (row[p], row[q]);
                row[p] = c * akp - s * akq;
                row[q] = s * akp + c * akq;
            }
            for k in 0..3 {
                let (apk, aqk) = (a[p][k], a[q][k]);
                a[p][k] = c * apk - s * aqk;
                a[q][k] = s * apk + c * aqk;
            }
            for row in v.iter_mut() {
                let (vkp, vkq) = (row[p], row[q]);
                row[p] = c * vkp - s * vkq;
                row[q] = s * vkp + c * vkq;
            }
        }
    }

    ([a[0][0], a[1][1], a[2][2]], v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::RigidTransform;
    use glam::DQuat;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_cloud(rng: &mut StdRng, n: usize) -> Vec<Point3> {
        let stretch = DVec3::new(
            rng.gen_range(0.1..10.0),
            rng.gen_range(0.1..10.0),
            rng.gen_range(0.1..10.0),
        );
        let t = RigidTransform::from_rotation_translation(
            DQuat::from_euler(
                glam::EulerRot::XYZ,
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            ),
            DVec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            ),
        );
        (0..n)
            .map(|_| {
                let local = DVec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ) * stretch;
                t.transform_point(local)
            })
            .collect()
    }

    #[test]
    fn test_contains_every_point() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(2..64);
            let points = random_cloud(&mut rng, n);
            let b = BoxBuilder::build_from_points(&points).unwrap();
            for p in &points {
                assert!(b.contains_point(*p, 1e-6), "point {p:?} outside {b:?}");
            }
        }
    }

    #[test]
    fn test_axes_orthonormal_right_handed() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let points = random_cloud(&mut rng, 20);
            let b = BoxBuilder::build_from_points(&points).unwrap();
            assert!(b.is_orthonormal(1e-7));
            assert!(b.x_axis().cross(b.y_axis()).dot(b.z_axis()) > 0.0);
            assert!(b.half_sizes.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_recovers_rotated_cuboid() {
        let source = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(3.0, 2.0, 1.0));
        let t = RigidTransform::from_rotation_translation(
            DQuat::from_euler(glam::EulerRot::YXZ, 0.5, -0.25, 1.2),
            DVec3::new(10.0, -3.0, 2.0),
        );
        let moved = source.transformed(&t);
        let fitted = BoxBuilder::build_from_points(&moved.corners()).unwrap();

        let eps = 1e-8;
        assert!((fitted.half_sizes - DVec3::new(3.0, 2.0, 1.0)).length() < eps);
        assert!((fitted.center - moved.center).length() < eps);
        assert!(fitted.x_axis().dot(moved.x_axis()).abs() > 1.0 - eps);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            BoxBuilder::build_from_points(&[]),
            Err(CadboxError::DegenerateInput { .. })
        ));
        assert!(BoxBuilder::build_from_points(&[DVec3::ONE]).is_err());
        assert!(BoxBuilder::build_from_points(&[DVec3::ONE; 5]).is_err());
        assert!(BoxBuilder::build_from_points(&[DVec3::ONE, DVec3::NAN]).is_err());
    }

    #[test]
    fn test_two_points_give_flat_box() {
        let a = DVec3::new(1.0, 1.0, 1.0);
        let b = DVec3::new(3.0, 1.0, 1.0);
        let fitted = BoxBuilder::build_from_points(&[a, b]).unwrap();
        assert!((fitted.half_sizes.x - 1.0).abs() < 1e-12);
        assert!(fitted.half_sizes.y.abs() < 1e-12);
        assert!(fitted.half_sizes.z.abs() < 1e-12);
        assert!(fitted.contains_point(a, 1e-9) && fitted.contains_point(b, 1e-9));
    }

    #[test]
    fn test_union_covers_inputs() {
        let a = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::ONE);
        let b = OrientedBox::axis_aligned(DVec3::new(5.0, 1.0, 0.0), DVec3::new(0.5, 2.0, 1.0))
            .transformed(&RigidTransform::from_axis_angle(DVec3::Y, 0.3));
        let merged = BoxBuilder::build_from_shape_union(&[a, b]).unwrap();
        assert!(merged.contains_box(&a, 1e-6));
        assert!(merged.contains_box(&b, 1e-6));
        assert!(BoxBuilder::build_from_shape_union(&[]).is_err());
    }
}
