//! Triangle-soup kernel.
//!
//! Solids are lists of faces and faces are lists of triangles. Native boxes
//! are PCA fits over face vertices, triangulation returns the stored
//! triangles, and areas are summed triangle areas unless a face carries an
//! exact area (as an analytic kernel would report for a sphere).

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use super::{CadKernel, MeshParameters};
use crate::builder::BoxBuilder;
use crate::error::{KernelError, KernelQueryKind};
use crate::geom::{Point3, RigidTransform};
use crate::obb::OrientedBox;

/// One face of a [`PolySolid`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFace {
    id: usize,
    triangles: Vec<[Point3; 3]>,
    /// Extra points that bound the face but carry no mesh.
    boundary: Vec<Point3>,
    area: Option<f64>,
}

impl PolyFace {
    pub fn new(id: usize, triangles: Vec<[Point3; 3]>) -> Self {
        Self {
            id,
            triangles,
            boundary: Vec::new(),
            area: None,
        }
    }

    /// A face known only by its boundary points; it triangulates to nothing.
    pub fn unmeshed(id: usize, boundary: Vec<Point3>) -> Self {
        Self {
            boundary,
            ..Self::new(id, Vec::new())
        }
    }

    /// Planar quad `a b c d` split along `a c`.
    pub fn quad(id: usize, [a, b, c, d]: [Point3; 4]) -> Self {
        Self::new(id, vec![[a, b, c], [a, c, d]])
    }

    /// Report `area` instead of the summed triangle area.
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn triangles(&self) -> &[[Point3; 3]] {
        &self.triangles
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        self.triangles
            .iter()
            .flatten()
            .chain(self.boundary.iter())
            .copied()
    }

    pub fn mesh_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| 0.5 * (*b - *a).cross(*c - *a).length())
            .sum()
    }

    pub fn area(&self) -> f64 {
        self.area.unwrap_or_else(|| self.mesh_area())
    }

    fn transformed(&self, t: &RigidTransform) -> Self {
        Self {
            id: self.id,
            triangles: self
                .triangles
                .iter()
                .map(|tri| tri.map(|p| t.transform_point(p)))
                .collect(),
            boundary: self.boundary.iter().map(|&p| t.transform_point(p)).collect(),
            area: self.area,
        }
    }
}

/// A solid as an ordered list of faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolySolid {
    faces: Vec<PolyFace>,
}

impl PolySolid {
    pub fn new(faces: Vec<PolyFace>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[PolyFace] {
        &self.faces
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        self.faces.iter().flat_map(PolyFace::vertices)
    }

    /// Axis-aligned cuboid with six quad faces.
    pub fn cuboid(center: Point3, half: DVec3) -> Self {
        let c = |sx: f64, sy: f64, sz: f64| center + DVec3::new(sx, sy, sz) * half;
        let faces = vec![
            PolyFace::quad(0, [c(-1., -1., -1.), c(-1., 1., -1.), c(1., 1., -1.), c(1., -1., -1.)]),
            PolyFace::quad(1, [c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)]),
            PolyFace::quad(2, [c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)]),
            PolyFace::quad(3, [c(-1., 1., -1.), c(-1., 1., 1.), c(1., 1., 1.), c(1., 1., -1.)]),
            PolyFace::quad(4, [c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)]),
            PolyFace::quad(5, [c(1., -1., -1.), c(1., 1., -1.), c(1., 1., 1.), c(1., -1., 1.)]),
        ];
        Self { faces }
    }

    /// Sphere as a single face; its reported area is the exact `4πr²`.
    pub fn uv_sphere(center: Point3, radius: f64, segments: usize, rings: usize) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let point = |ring: usize, seg: usize| {
            let phi = PI * ring as f64 / rings as f64;
            let theta = TAU * (seg % segments) as f64 / segments as f64;
            center
                + DVec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                ) * radius
        };

        let mut triangles = Vec::with_capacity(2 * segments * rings);
        for ring in 0..rings {
            for seg in 0..segments {
                let (a, b) = (point(ring, seg), point(ring, seg + 1));
                let (c, d) = (point(ring + 1, seg + 1), point(ring + 1, seg));
                if ring != 0 {
                    triangles.push([a, d, b]);
                }
                if ring != rings - 1 {
                    triangles.push([b, d, c]);
                }
            }
        }

        Self {
            faces: vec![PolyFace::new(0, triangles).with_area(4.0 * PI * radius * radius)],
        }
    }

    /// Cylinder along +Z: lateral face, bottom cap, top cap.
    pub fn cylinder(center: Point3, radius: f64, height: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        let half = height * 0.5;
        let rim = |seg: usize, z: f64| {
            let theta = TAU * (seg % segments) as f64 / segments as f64;
            center + DVec3::new(radius * theta.cos(), radius * theta.sin(), z)
        };

        let mut lateral = Vec::with_capacity(2 * segments);
        let mut bottom = Vec::with_capacity(segments);
        let mut top = Vec::with_capacity(segments);
        let (bottom_center, top_center) = (center - DVec3::Z * half, center + DVec3::Z * half);
        for seg in 0..segments {
            let (a, b) = (rim(seg, -half), rim(seg + 1, -half));
            let (c, d) = (rim(seg + 1, half), rim(seg, half));
            lateral.push([a, b, c]);
            lateral.push([a, c, d]);
            bottom.push([bottom_center, b, a]);
            top.push([top_center, d, c]);
        }

        let cap_area = PI * radius * radius;
        Self {
            faces: vec![
                PolyFace::new(0, lateral).with_area(TAU * radius * height),
                PolyFace::new(1, bottom).with_area(cap_area),
                PolyFace::new(2, top).with_area(cap_area),
            ],
        }
    }

    pub fn transformed(&self, t: &RigidTransform) -> Self {
        Self {
            faces: self.faces.iter().map(|f| f.transformed(t)).collect(),
        }
    }
}

/// [`CadKernel`] over [`PolySolid`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyKernel;

impl PolyKernel {
    pub fn new() -> Self {
        Self
    }
}

/// PCA fit over the distinct vertices; shared vertices count once.
fn fit(mut points: Vec<Point3>) -> Result<OrientedBox, KernelError> {
    points.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    points.dedup();
    BoxBuilder::build_from_points(&points)
        .map_err(|e| KernelError::new(KernelQueryKind::Box, e.to_string()))
}

impl CadKernel for PolyKernel {
    type Solid = PolySolid;
    type Face = PolyFace;

    fn enumerate_faces(&self, solid: &PolySolid) -> Result<Vec<PolyFace>, KernelError> {
        Ok(solid.faces.clone())
    }

    fn solid_obb(&self, solid: &PolySolid) -> Result<OrientedBox, KernelError> {
        fit(solid.vertices().collect())
    }

    fn face_obb(&self, face: &PolyFace) -> Result<OrientedBox, KernelError> {
        fit(face.vertices().collect())
    }

    fn triangulate(
        &self,
        face: &PolyFace,
        _params: &MeshParameters,
    ) -> Result<Vec<[Point3; 3]>, KernelError> {
        Ok(face.triangles.clone())
    }

    fn face_area(&self, face: &PolyFace) -> Result<f64, KernelError> {
        Ok(face.area())
    }

    fn solid_area(&self, solid: &PolySolid) -> Result<f64, KernelError> {
        Ok(solid.faces.iter().map(PolyFace::area).sum())
    }
}
