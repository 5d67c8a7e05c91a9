//! CAD kernel boundary.
//!
//! The engine never builds B-rep geometry itself. Everything it needs from a
//! geometry kernel (face enumeration, the kernel's own oriented box query,
//! triangulation and surface area) goes through [`CadKernel`].

#[cfg(feature = "polyhedral")]
pub mod polyhedral;

use crate::consts::{INDEX_ANGULAR_DEFLECTION, INDEX_LINEAR_DEFLECTION};
use crate::error::KernelError;
use crate::geom::Point3;
use crate::obb::OrientedBox;

/// Services consumed from a geometry kernel.
///
/// Calls are synchronous and may run for a long time; the engine applies no
/// timeout and never retries a failed query.
pub trait CadKernel: Sync {
    type Solid;
    type Face: Clone + Send + Sync;

    /// Faces of `solid` in the kernel's traversal order.
    fn enumerate_faces(&self, solid: &Self::Solid) -> Result<Vec<Self::Face>, KernelError>;

    /// The kernel's native oriented box, re-fitted to the whole solid.
    fn solid_obb(&self, solid: &Self::Solid) -> Result<OrientedBox, KernelError>;

    /// The kernel's native oriented box for one face.
    fn face_obb(&self, face: &Self::Face) -> Result<OrientedBox, KernelError>;

    /// Triangulated approximation of `face`.
    ///
    /// An empty result means the face has no fragments and is not an error.
    fn triangulate(
        &self,
        face: &Self::Face,
        params: &MeshParameters,
    ) -> Result<Vec<[Point3; 3]>, KernelError>;

    fn face_area(&self, face: &Self::Face) -> Result<f64, KernelError>;

    fn solid_area(&self, solid: &Self::Solid) -> Result<f64, KernelError>;
}

/// Meshing parameters handed to [`CadKernel::triangulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshParameters {
    /// Linear deflection. Default: 1.0.
    pub deflection: f64,
    /// Angular deflection in radians. Default: 1.0.
    pub angle: f64,
    /// Linear deflection for face interiors. Default: 1.0.
    pub deflection_interior: f64,
    /// Angular deflection for face interiors. Default: 1.0.
    pub angle_interior: f64,
    /// Minimum element size; negative lets the kernel decide. Default: -1.0.
    pub min_size: f64,
    /// Mesh faces in parallel. Default: true.
    pub in_parallel: bool,
    /// Deflection is relative to edge size. Default: false.
    pub relative: bool,
    /// Insert interior vertices. Default: true.
    pub internal_vertices: bool,
    /// Check surface deflection of the result. Default: true.
    pub control_surface_deflection: bool,
    /// Drop stale triangulations first. Default: true.
    pub clean_model: bool,
    /// Adapt `min_size` to the deflection. Default: false.
    pub adjust_min_size: bool,
    /// Apply face deflection to edges too. Default: false.
    pub force_face_deflection: bool,
    /// Accept a lower quality mesh instead of failing. Default: true.
    pub allow_quality_decrease: bool,
}

impl Default for MeshParameters {
    fn default() -> Self {
        Self {
            deflection: INDEX_LINEAR_DEFLECTION,
            angle: INDEX_ANGULAR_DEFLECTION,
            deflection_interior: 1.0,
            angle_interior: 1.0,
            min_size: -1.0,
            in_parallel: true,
            relative: false,
            internal_vertices: true,
            control_surface_deflection: true,
            clean_model: true,
            adjust_min_size: false,
            force_face_deflection: false,
            allow_quality_decrease: true,
        }
    }
}

impl MeshParameters {
    /// The fixed tessellation used by a shape box index.
    pub fn coarse() -> Self {
        Self {
            deflection: INDEX_LINEAR_DEFLECTION,
            angle: INDEX_ANGULAR_DEFLECTION,
            ..Self::default()
        }
    }

    pub fn with_deflection(mut self, deflection: f64, angle: f64) -> Self {
        self.deflection = deflection;
        self.angle = angle;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.in_parallel = false;
        self
    }
}
