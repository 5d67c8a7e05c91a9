//! Error types for box construction, indexing and kernel queries.

use std::fmt;

use thiserror::Error;

/// Which kernel service failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelQueryKind {
    Faces,
    Box,
    Area,
    Triangulation,
}

impl fmt::Display for KernelQueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelQueryKind::Faces => "face enumeration",
            KernelQueryKind::Box => "oriented box",
            KernelQueryKind::Area => "surface area",
            KernelQueryKind::Triangulation => "triangulation",
        };
        f.write_str(name)
    }
}

/// A failure reported by the CAD kernel collaborator.
#[derive(Debug, Clone, Error)]
#[error("kernel {query} query failed: {message}")]
pub struct KernelError {
    pub query: KernelQueryKind,
    pub message: String,
}

impl KernelError {
    pub fn new(query: KernelQueryKind, message: impl Into<String>) -> Self {
        Self {
            query,
            message: message.into(),
        }
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum CadboxError {
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: &'static str },

    #[error("shape has no faces")]
    EmptyShape,

    #[error("transform is not rigid (deviation {deviation:e})")]
    NonRigidTransform { deviation: f64 },

    #[error(transparent)]
    KernelQuery(#[from] KernelError),

    #[error("{worker} worker panicked")]
    WorkerPanicked { worker: &'static str },
}

impl CadboxError {
    pub(crate) fn degenerate(reason: &'static str) -> Self {
        CadboxError::DegenerateInput { reason }
    }
}

pub type Result<T> = std::result::Result<T, CadboxError>;
