//! Per-face box index of a solid.
//!
//! [`ShapeBoxIndex`] holds the kernel's box for the whole solid and, in
//! kernel traversal order, one [`FaceBoxEntry`] per face with the face box
//! and its coarse triangle fragments.

use crate::consts::FACE_TRIANGLE_TOLERANCE;
use crate::display::DisplaySink;
use crate::error::{CadboxError, Result};
use crate::geom::{Aabb, Triangle};
use crate::kernel::{CadKernel, MeshParameters};
use crate::obb::OrientedBox;
use crate::tightness::TightnessClassifier;

/// What [`ShapeBoxIndex::display`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObbLevel {
    /// The whole-solid box.
    #[default]
    Shape,
    /// One box per face.
    Face,
    /// Every face fragment.
    Triangle,
}

/// One face with its box and fragments.
#[derive(Debug, Clone)]
pub struct FaceBoxEntry<F> {
    face: F,
    bbox: OrientedBox,
    triangles: Vec<Triangle>,
}

impl<F> FaceBoxEntry<F> {
    pub fn face(&self) -> &F {
        &self.face
    }

    pub fn bbox(&self) -> &OrientedBox {
        &self.bbox
    }

    /// Fragments kept after the tolerance filter; empty for boxes-only
    /// builds and for faces the kernel meshes to nothing.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// Tightness decision for the face at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceClass {
    pub index: usize,
    pub box_like: bool,
}

/// Boxes for a solid and each of its faces.
#[derive(Debug, Clone)]
pub struct ShapeBoxIndex<F> {
    solid_box: OrientedBox,
    faces: Vec<FaceBoxEntry<F>>,
}

impl<F: Clone> ShapeBoxIndex<F> {
    /// Walk every face of `solid`, boxing and triangulating each one.
    ///
    /// Fragments with two vertices within 0.01 are dropped. The solid box is
    /// the kernel's own query on the solid, not a merge of face boxes.
    pub fn build<K>(kernel: &K, solid: &K::Solid) -> Result<Self>
    where
        K: CadKernel<Face = F>,
    {
        Self::walk(kernel, solid, Some(&MeshParameters::coarse()))
    }

    /// Like [`ShapeBoxIndex::build`] but leaves every fragment list empty.
    pub fn build_boxes_only<K>(kernel: &K, solid: &K::Solid) -> Result<Self>
    where
        K: CadKernel<Face = F>,
    {
        Self::walk(kernel, solid, None)
    }

    fn walk<K>(kernel: &K, solid: &K::Solid, params: Option<&MeshParameters>) -> Result<Self>
    where
        K: CadKernel<Face = F>,
    {
        let faces = kernel.enumerate_faces(solid)?;
        if faces.is_empty() {
            return Err(CadboxError::EmptyShape);
        }

        let mut entries = Vec::with_capacity(faces.len());
        let mut discarded = 0usize;
        for (i, face) in faces.into_iter().enumerate() {
            let bbox = kernel.face_obb(&face)?;
            let triangles = match params {
                Some(params) => {
                    let raw = kernel.triangulate(&face, params)?;
                    let total = raw.len();
                    let kept: Vec<Triangle> = raw
                        .into_iter()
                        .filter_map(|[a, b, c]| Triangle::try_new(a, b, c, FACE_TRIANGLE_TOLERANCE))
                        .collect();
                    discarded += total - kept.len();
                    kept
                }
                None => Vec::new(),
            };
            tracing::debug!(
                face = i,
                fragments = triangles.len(),
                half_sizes = ?bbox.half_sizes,
                "indexed face"
            );
            entries.push(FaceBoxEntry {
                face,
                bbox,
                triangles,
            });
        }

        if discarded > 0 {
            tracing::warn!(discarded, "dropped degenerate face fragments");
        }

        let solid_box = kernel.solid_obb(solid)?;
        let index = Self {
            solid_box,
            faces: entries,
        };
        tracing::info!(
            faces = index.len(),
            triangles = index.triangle_count(),
            "built shape box index"
        );
        Ok(index)
    }
}

impl<F> ShapeBoxIndex<F> {
    pub fn solid_box(&self) -> &OrientedBox {
        &self.solid_box
    }

    pub fn faces(&self) -> &[FaceBoxEntry<F>] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangles.len()).sum()
    }

    /// World AABB of every face box.
    pub fn full_aabb(&self) -> Aabb {
        self.faces
            .iter()
            .fold(Aabb::empty(), |acc, f| acc.merge(&f.bbox.aabb()))
    }

    /// Send the requested level of detail to `sink`.
    pub fn display(&self, sink: &mut dyn DisplaySink, level: ObbLevel) {
        match level {
            ObbLevel::Shape => sink.draw_outline(&self.solid_box.to_outline()),
            ObbLevel::Face => {
                for entry in &self.faces {
                    sink.draw_outline(&entry.bbox.to_outline());
                }
            }
            ObbLevel::Triangle => {
                for tri in self.faces.iter().flat_map(|f| f.triangles.iter()) {
                    sink.draw_triangle(tri);
                }
            }
        }
    }

    /// Classify every face as box-like or curved.
    pub fn classify_faces<K>(
        &self,
        kernel: &K,
        classifier: &TightnessClassifier,
    ) -> Result<Vec<FaceClass>>
    where
        K: CadKernel<Face = F>,
    {
        self.faces
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Ok(FaceClass {
                    index,
                    box_like: classifier.is_box_like(kernel, &entry.face, &entry.bbox)?,
                })
            })
            .collect()
    }
}
