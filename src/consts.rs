//! Named numeric constants shared across the engine.

/// Vertices closer than this make a face fragment degenerate.
pub const FACE_TRIANGLE_TOLERANCE: f64 = 0.01;

/// Vertices closer than this make a whole-shape mesh triangle degenerate.
pub const MESH_TRIANGLE_TOLERANCE: f64 = 0.0001;

/// Linear deflection used when an index triangulates its faces.
pub const INDEX_LINEAR_DEFLECTION: f64 = 1.0;

/// Angular deflection (radians) used when an index triangulates its faces.
pub const INDEX_ANGULAR_DEFLECTION: f64 = 1.0;

/// Face area over box area above which a face counts as box-like.
pub const TIGHTNESS_THRESHOLD: f64 = std::f64::consts::FRAC_PI_4;

/// Added to the enlarge margin to decide whether a box is flat.
pub const FLAT_BOX_SLACK: f64 = 0.0005;

/// Enlarge margin for boxes built on whole shapes.
pub const SHAPE_ENLARGE_MARGIN: f64 = 0.0001;

/// Enlarge margin for boxes built on single faces.
pub const FACE_ENLARGE_MARGIN: f64 = 0.001;

/// Padding applied before a box becomes a display outline.
pub const DISPLAY_MARGIN: f64 = 0.01;

/// Tolerance on axis length and pairwise dot products.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-7;

/// Tolerance on the linear part of a rigid transform.
pub const RIGID_TOLERANCE: f64 = 1e-7;

/// Default element-wise precision when comparing two transforms.
pub const SAME_TRANSFORM_PRECISION: f64 = 0.0001;

/// Points closer than this are the same point for box construction.
pub const DISTINCT_POINT_TOLERANCE: f64 = 1e-9;

/// Candidate separating axes with `|a|² <= AXIS_EPSILON · |edge|²` are ignored.
pub const AXIS_EPSILON: f64 = 1e-12;

/// Length below which a vector cannot be normalized.
pub const NORMALIZE_EPSILON: f64 = 1e-12;
