//! Shared fixtures for the cadbox benchmarks.

use cadbox::{OrientedBox, Point3, RigidTransform, Triangle};
use glam::{DQuat, DVec3, EulerRot};
use rand::{rngs::StdRng, Rng, SeedableRng};

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
            EulerRot::XYZ,
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        ),
        random_vec(rng, 1.0),
    )
}

/// A rotated box of roughly unit size near the origin.
pub fn setup_box(seed: u64) -> OrientedBox {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = DVec3::new(
        rng.gen_range(0.5..2.0),
        rng.gen_range(0.5..2.0),
        rng.gen_range(0.5..2.0),
    );
    OrientedBox::axis_aligned(DVec3::ZERO, half).transformed(&random_transform(&mut rng))
}

/// `n` triangles scattered over a cube of half size `spread`.
///
/// With `spread` around 4 about half of them hit [`setup_box`].
pub fn setup_triangle_soup(n: usize, spread: f64, seed: u64) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let p = random_vec(&mut rng, spread);
            Triangle::from_points_unchecked(
                p,
                p + random_vec(&mut rng, 1.0),
                p + random_vec(&mut rng, 1.0),
            )
        })
        .collect()
}

/// `n` points from a stretched, rotated cloud.
pub fn setup_point_cloud(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let t = random_transform(&mut rng);
    (0..n)
        .map(|_| t.transform_point(random_vec(&mut rng, 1.0) * DVec3::new(5.0, 2.0, 0.5)))
        .collect()
}
