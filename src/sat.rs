//! Separating Axis Theorem tests between an oriented box and a triangle.
//!
//! Two strategies answer the same question:
//!
//! - **Oriented**: project straight onto the 13 candidate axes in world
//!   space. No setup cost, best for one-off queries.
//! - **Axis-aligned**: move the triangle into the box frame first, where the
//!   box is a centered AABB and every projection radius is a weighted sum of
//!   axis components. Best when one box is tested against many triangles,
//!   see [`LocalFrameTester`].
//!
//! Candidate axes are the 3 box axes, the triangle normal and the 9 cross
//! products of triangle edges with box axes. Near-zero candidates carry no
//! information and are skipped. Touching intervals count as overlapping.

use glam::DVec3;

use crate::consts::AXIS_EPSILON;
use crate::geom::{RigidTransform, Triangle, Vector3};
use crate::obb::OrientedBox;

/// Closed interval of projections on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    #[inline]
    pub fn around(center: f64, radius: f64) -> Self {
        Self {
            min: center - radius,
            max: center + radius,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// The overlap primitive shared by both strategies.
#[inline]
pub fn intervals_overlap(a: Interval, b: Interval) -> bool {
    a.overlaps(&b)
}

/// Interval covered by the triangle vertices projected on `axis`.
#[inline]
pub fn project_triangle(vertices: &[DVec3; 3], axis: Vector3) -> Interval {
    let p0 = vertices[0].dot(axis);
    let p1 = vertices[1].dot(axis);
    let p2 = vertices[2].dot(axis);
    Interval {
        min: p0.min(p1).min(p2),
        max: p0.max(p1).max(p2),
    }
}

/// True when `axis` is too short relative to `scale²` to separate anything.
#[inline]
fn is_degenerate_axis(axis: Vector3, scale_sq: f64) -> bool {
    axis.length_squared() <= AXIS_EPSILON * scale_sq
}

/// Which formulation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SatStrategy {
    #[default]
    Oriented,
    AxisAligned,
}

/// Box versus triangle intersection tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparatingAxisTester;

impl SeparatingAxisTester {
    /// SAT in world space against the box's own axes.
    ///
    /// Returns `false` as soon as one axis separates the shapes.
    pub fn test_oriented_box_vs_triangle(bbox: &OrientedBox, tri: &Triangle) -> bool {
        let vertices = tri.vertices();
        let edges = tri.edges();

        let separates = |axis: Vector3| {
            let box_interval =
                Interval::around(bbox.center.dot(axis), bbox.projection_radius(axis));
            !intervals_overlap(box_interval, project_triangle(&vertices, axis))
        };

        for (i, edge) in edges.iter().enumerate() {
            for (j, box_axis) in bbox.axes.iter().enumerate() {
                let axis = edge.cross(*box_axis);
                if is_degenerate_axis(axis, edge.length_squared()) {
                    continue;
                }
                if separates(axis) {
                    tracing::trace!(edge = i, box_axis = j, "separated on edge cross axis");
                    return false;
                }
            }
        }

        for (j, box_axis) in bbox.axes.iter().enumerate() {
            if separates(*box_axis) {
                tracing::trace!(box_axis = j, "separated on box axis");
                return false;
            }
        }

        let normal = edges[0].cross(edges[1]);
        if !is_degenerate_axis(normal, edges[0].length_squared() * edges[1].length_squared())
            && separates(normal)
        {
            tracing::trace!("separated on triangle normal");
            return false;
        }

        true
    }

    /// SAT after moving the triangle into the box frame.
    pub fn test_axis_aligned_vs_triangle(bbox: &OrientedBox, tri: &Triangle) -> bool {
        LocalFrameTester::new(bbox).test(tri)
    }

    pub fn test_with(strategy: SatStrategy, bbox: &OrientedBox, tri: &Triangle) -> bool {
        match strategy {
            SatStrategy::Oriented => Self::test_oriented_box_vs_triangle(bbox, tri),
            SatStrategy::AxisAligned => Self::test_axis_aligned_vs_triangle(bbox, tri),
        }
    }

    /// Indices of the triangles that intersect `bbox`.
    pub fn cull(bbox: &OrientedBox, triangles: &[Triangle]) -> Vec<usize> {
        let tester = LocalFrameTester::new(bbox);
        let hits: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, tri)| tester.test(tri))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(tested = triangles.len(), hits = hits.len(), "culled triangles");
        hits
    }
}

/// A box frozen in its own frame, for testing many triangles.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrameTester {
    to_local: RigidTransform,
    half_sizes: DVec3,
}

impl LocalFrameTester {
    pub fn new(bbox: &OrientedBox) -> Self {
        Self {
            to_local: RigidTransform::local_frame_of(bbox),
            half_sizes: bbox.half_sizes,
        }
    }

    /// Test a world-space triangle.
    pub fn test(&self, tri: &Triangle) -> bool {
        Self::test_local(self.half_sizes, &tri.transformed(&self.to_local))
    }

    /// AABB SAT for a box centered at the origin with `half` extents.
    pub fn test_local(half: DVec3, tri: &Triangle) -> bool {
        let vertices = tri.vertices();
        let edges = tri.edges();
        let radius = |a: Vector3| half.x * a.x.abs() + half.y * a.y.abs() + half.z * a.z.abs();
        let separates = |axis: Vector3| {
            !intervals_overlap(
                Interval::around(0.0, radius(axis)),
                project_triangle(&vertices, axis),
            )
        };

        for edge in &edges {
            for unit in [DVec3::X, DVec3::Y, DVec3::Z] {
                let axis = edge.cross(unit);
                if is_degenerate_axis(axis, edge.length_squared()) {
                    continue;
                }
                if separates(axis) {
                    return false;
                }
            }
        }

        // Box face normals reduce to per-component range checks.
        let lo = vertices[0].min(vertices[1]).min(vertices[2]);
        let hi = vertices[0].max(vertices[1]).max(vertices[2]);
        if lo.cmpgt(half).any() || hi.cmplt(-half).any() {
            return false;
        }

        let normal = edges[0].cross(edges[1]);
        if !is_degenerate_axis(normal, edges[0].length_squared() * edges[1].length_squared())
            && separates(normal)
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn unit_cube() -> OrientedBox {
        OrientedBox::axis_aligned(DVec3::ZERO, DVec3::ONE)
    }

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
        Triangle::from_points_unchecked(DVec3::from(a), DVec3::from(b), DVec3::from(c))
    }

    fn both(bbox: &OrientedBox, t: &Triangle) -> (bool, bool) {
        (
            SeparatingAxisTester::test_oriented_box_vs_triangle(bbox, t),
            SeparatingAxisTester::test_axis_aligned_vs_triangle(bbox, t),
        )
    }

    fn random_vec(rng: &mut StdRng, range: f64) -> DVec3 {
        DVec3::new(
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
        )
    }

    fn random_transform(rng: &mut StdRng) -> RigidTransform {
        RigidTransform::from_rotation_translation(
            DQuat::from_euler(
                glam::EulerRot::XYZ,
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            ),
            random_vec(rng, 10.0),
        )
    }

    fn random_box(rng: &mut StdRng) -> OrientedBox {
        let half = DVec3::new(
            rng.gen_range(0.1..3.0),
            rng.gen_range(0.1..3.0),
            rng.gen_range(0.1..3.0),
        );
        OrientedBox::axis_aligned(DVec3::ZERO, half).transformed(&random_transform(rng))
    }

    /// A triangle near the box, so that roughly half the cases intersect.
    fn random_triangle(rng: &mut StdRng, near: DVec3) -> Triangle {
        let p = near + random_vec(rng, 4.0);
        Triangle::from_points_unchecked(p, p + random_vec(rng, 2.0), p + random_vec(rng, 2.0))
    }

    #[test]
    fn test_triangle_inside_cube() {
        let t = tri([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]);
        assert_eq!(both(&unit_cube(), &t), (true, true));
    }

    #[test]
    fn test_far_triangle_separated() {
        let t = tri([10.0, 10.0, 10.0], [11.0, 10.0, 10.0], [10.0, 11.0, 10.0]);
        assert_eq!(both(&unit_cube(), &t), (false, false));
    }

    #[test]
    fn test_large_triangle_through_cube() {
        // No vertex inside the box, but the face cuts through it.
        let t = tri([-10.0, -10.0, 0.0], [10.0, -10.0, 0.0], [0.0, 10.0, 0.0]);
        assert_eq!(both(&unit_cube(), &t), (true, true));
    }

    #[test]
    fn test_separated_only_by_edge_cross_axis() {
        // Corner region of the cube: the box axes and the normal all overlap.
        let t = tri([1.6, 0.0, 0.0], [0.0, 1.6, 0.0], [1.6, 1.6, 5.0]);
        let (oriented, aligned) = both(&unit_cube(), &t);
        assert_eq!(oriented, aligned);

        let far = tri([2.5, 0.0, -1.0], [0.0, 2.5, -1.0], [0.0, 2.5, 1.0]);
        assert_eq!(both(&unit_cube(), &far), (false, false));
    }

    #[test]
    fn test_touching_counts_as_overlap() {
        let t = tri([1.0, -0.5, -0.5], [3.0, 0.0, 0.0], [1.0, 0.5, 0.5]);
        assert_eq!(both(&unit_cube(), &t), (true, true));
    }

    #[test]
    fn test_flat_box_against_coplanar_triangle() {
        let flat = OrientedBox::axis_aligned(DVec3::ZERO, DVec3::new(5.0, 5.0, 0.0));
        let inside = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = inside.translated(DVec3::Z * 0.1);
        assert_eq!(both(&flat, &inside), (true, true));
        assert_eq!(both(&flat, &above), (false, false));
    }

    #[test]
    fn test_degenerate_triangle_does_not_panic() {
        let point = tri([0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, 0.5]);
        assert_eq!(both(&unit_cube(), &point), (true, true));
        let outside = point.translated(DVec3::X * 5.0);
        assert_eq!(both(&unit_cube(), &outside), (false, false));
    }

    #[test]
    fn test_rotated_box_respects_orientation() {
        // 45 degrees about Z: the world AABB contains (1.2, 1.2, 0) but the box does not.
        let rot = RigidTransform::from_axis_angle(DVec3::Z, std::f64::consts::FRAC_PI_4);
        let b = unit_cube().transformed(&rot);
        let near_corner = tri([1.3, 0.0, 0.0], [1.35, 0.02, 0.0], [1.3, 0.02, 0.02]);
        let past_face = tri([1.2, 1.2, 0.0], [1.25, 1.2, 0.0], [1.2, 1.25, 0.0]);
        assert_eq!(both(&b, &near_corner), (true, true));
        assert_eq!(both(&b, &past_face), (false, false));
    }

    #[test]
    fn test_strategies_agree_on_random_input() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = 0;
        for _ in 0..5000 {
            let b = random_box(&mut rng);
            let t = random_triangle(&mut rng, b.center);
            let (oriented, aligned) = both(&b, &t);
            assert_eq!(oriented, aligned, "box {b:?} triangle {t:?}");
            hits += oriented as usize;
        }
        assert!(hits > 500 && hits < 4500, "unbalanced sample: {hits}");
    }

    #[test]
    fn test_invariant_under_rigid_transform() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..2000 {
            let b = random_box(&mut rng);
            let t = random_triangle(&mut rng, b.center);
            let r = random_transform(&mut rng);
            assert_eq!(
                SeparatingAxisTester::test_oriented_box_vs_triangle(&b, &t),
                SeparatingAxisTester::test_oriented_box_vs_triangle(
                    &b.transformed(&r),
                    &t.transformed(&r)
                ),
            );
        }
    }

    #[test]
    fn test_cull_returns_hit_indices() {
        let b = unit_cube();
        let triangles = [
            tri([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0]),
            tri([10.0, 10.0, 10.0], [11.0, 10.0, 10.0], [10.0, 11.0, 10.0]),
            tri([-10.0, -10.0, 0.0], [10.0, -10.0, 0.0], [0.0, 10.0, 0.0]),
        ];
        assert_eq!(SeparatingAxisTester::cull(&b, &triangles), vec![0, 2]);
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::around(0.0, 1.0);
        assert!(intervals_overlap(a, Interval { min: 1.0, max: 2.0 }));
        assert!(!intervals_overlap(a, Interval { min: 1.0001, max: 2.0 }));
        assert!(intervals_overlap(Interval { min: -3.0, max: 3.0 }, a));
    }
}
