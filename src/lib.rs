//! cadbox
//!
//! Oriented bounding boxes and separating-axis triangle tests for CAD shapes.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geom** - Points, triangles, rigid transforms, axis-aligned boxes
//! 2. **obb** - The oriented box value type
//! 3. **builder** - PCA box fitting over points and box unions
//! 4. **sat** - Box versus triangle separating-axis tests
//! 5. **tightness** - Box-like versus curved face classification
//! 6. **kernel** - The CAD kernel boundary (`polyhedral` feature adds a triangle-soup kernel)
//! 7. **index** - Per-face box index of a solid
//! 8. **display** - Outlines and the display sink boundary
//! 9. **mesh** - Fork-join meshing of a whole shape

pub mod builder;
pub mod consts;
pub mod display;
pub mod error;
pub mod geom;
pub mod index;
pub mod kernel;
pub mod mesh;
pub mod obb;
pub mod sat;
pub mod tightness;

// Re-export commonly used types
pub use builder::BoxBuilder;
pub use display::{BoxOutline, DisplaySink, OutlineVertex, RecordingSink};
pub use error::{CadboxError, KernelError, KernelQueryKind, Result};
pub use geom::{Aabb, Point3, RigidTransform, Triangle, Vector3};
pub use index::{FaceBoxEntry, FaceClass, ObbLevel, ShapeBoxIndex};
pub use kernel::{CadKernel, MeshParameters};
pub use mesh::MeshJob;
pub use obb::OrientedBox;
pub use sat::{LocalFrameTester, SatStrategy, SeparatingAxisTester};
pub use tightness::TightnessClassifier;

#[cfg(feature = "polyhedral")]
pub use kernel::polyhedral::{PolyFace, PolyKernel, PolySolid};

// Re-export glam for convenience
pub use glam;
