//! Error types at the engine boundary.

use thiserror::Error;

/// Which side of a mapping a bone lookup failed on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SkeletonRole {
    Target,
    Source,
}

impl std::fmt::Display for SkeletonRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkeletonRole::Target => write!(f, "target"),
            SkeletonRole::Source => write!(f, "source"),
        }
    }
}

/// Per-mapping failures. Never fatal to a set-level operation: the set pass
/// collects these and keeps going.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("bone '{bone}' not found on {role} skeleton (mapping '{mapping}')")]
    BoneNotFound {
        mapping: String,
        bone: String,
        role: SkeletonRole,
    },
    #[error("helper bone '{helper}' missing during unbind (mapping '{mapping}')")]
    HelperMissing { mapping: String, helper: String },
}

/// Fatal bake failures, rejected before any mutation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BakeError {
    #[error("invalid frame range: start {start} must be below end {end}, step {step} must be > 0")]
    InvalidFrameRange { start: i32, end: i32, step: i32 },
    #[error("retarget set is not bound")]
    NotBound,
}

/// Retarget-set construction failures.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SetError {
    #[error("target and source skeleton must differ (got '{0}' for both)")]
    IdenticalSkeletons(String),
}

/// Preset save/load failures.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported preset version {0:?}")]
    UnsupportedVersion([u32; 3]),
}
