//! Whole-shape meshing and display as a fork-join job.
//!
//! A mesh worker triangulates every face and is joined; a display worker
//! then hands each triangle to the sink and is joined; finally the triangle
//! count is reported. Failures surface at the join point.

use std::num::NonZeroUsize;
use std::thread;

use crate::consts::MESH_TRIANGLE_TOLERANCE;
use crate::display::DisplaySink;
use crate::error::{CadboxError, Result};
use crate::geom::Triangle;
use crate::kernel::{CadKernel, MeshParameters};

/// Meshes a solid and streams the result to a display sink.
pub struct MeshJob<'a, K: CadKernel> {
    kernel: &'a K,
    solid: &'a K::Solid,
    params: MeshParameters,
}

impl<'a, K> MeshJob<'a, K>
where
    K: CadKernel,
    K::Solid: Sync,
{
    pub fn new(kernel: &'a K, solid: &'a K::Solid, params: MeshParameters) -> Self {
        Self {
            kernel,
            solid,
            params,
        }
    }

    pub fn params(&self) -> &MeshParameters {
        &self.params
    }

    /// Mesh, display, then report `"Mesh Triangles: N"` to `sink`.
    ///
    /// Returns the number of triangles displayed.
    pub fn run<S>(&self, sink: &mut S) -> Result<usize>
    where
        S: DisplaySink + Send + ?Sized,
    {
        let triangles = thread::scope(|s| {
            s.spawn(|| self.triangulate())
                .join()
                .map_err(|_| CadboxError::WorkerPanicked { worker: "mesh" })
        })??;

        let shown = thread::scope(|s| {
            s.spawn(|| {
                for tri in &triangles {
                    sink.draw_triangle(tri);
                }
                triangles.len()
            })
            .join()
            .map_err(|_| CadboxError::WorkerPanicked { worker: "display" })
        })?;

        sink.status(&format!("Mesh Triangles: {shown}"));
        tracing::info!(triangles = shown, "meshed shape");
        Ok(shown)
    }

    /// Triangulate every face, keeping kernel face order.
    ///
    /// Triangles with two vertices within 0.0001 are dropped.
    pub fn triangulate(&self) -> Result<Vec<Triangle>> {
        let faces = self.kernel.enumerate_faces(self.solid)?;
        if faces.is_empty() {
            return Ok(Vec::new());
        }

        let per_face = if self.params.in_parallel && faces.len() > 1 {
            self.triangulate_parallel(&faces)?
        } else {
            faces
                .iter()
                .map(|face| self.triangulate_face(face))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(per_face.into_iter().flatten().collect())
    }

    fn triangulate_parallel(&self, faces: &[K::Face]) -> Result<Vec<Vec<Triangle>>> {
        let workers = thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(faces.len());
        let chunk = faces.len().div_ceil(workers);
        tracing::debug!(faces = faces.len(), workers, "meshing faces in parallel");

        let joined: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = faces
                .chunks(chunk)
                .map(|group| {
                    s.spawn(move || {
                        group
                            .iter()
                            .map(|face| self.triangulate_face(face))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect()
        });

        let mut per_face = Vec::with_capacity(faces.len());
        for result in joined {
            let group = result.map_err(|_| CadboxError::WorkerPanicked { worker: "face mesh" })??;
            per_face.extend(group);
        }
        Ok(per_face)
    }

    fn triangulate_face(&self, face: &K::Face) -> Result<Vec<Triangle>> {
        let raw = self.kernel.triangulate(face, &self.params)?;
        let total = raw.len();
        let kept: Vec<Triangle> = raw
            .into_iter()
            .filter_map(|[a, b, c]| Triangle::try_new(a, b, c, MESH_TRIANGLE_TOLERANCE))
            .collect();
        if kept.len() < total {
            tracing::warn!(discarded = total - kept.len(), "dropped degenerate mesh triangles");
        }
        Ok(kept)
    }
}
