use std::borrow::Cow;

use thiserror::Error;

use crate::value::Shape;

/// Rejection of a single tagged value.
///
/// Value scoped and deterministic: the same input always fails the same way,
/// so callers never retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The content's shape is outside the handler's [`crate::TypeFilter`].
    #[error("tag {tag}: expected {expected}, found {found}")]
    ShapeMismatch {
        tag: u64,
        expected: String,
        found: Shape,
    },
    /// The shape fits but the content breaks the tag's semantics.
    #[error("tag {tag}: {reason}")]
    Invalid {
        tag: u64,
        reason: Cow<'static, str>,
        found: Shape,
    },
    #[error("tag {tag}: no handler registered")]
    UnknownTag { tag: u64 },
}

impl ValidationError {
    pub fn invalid(tag: u64, reason: impl Into<Cow<'static, str>>, found: Shape) -> Self {
        ValidationError::Invalid {
            tag,
            reason: reason.into(),
            found,
        }
    }

    pub fn tag(&self) -> u64 {
        match self {
            ValidationError::ShapeMismatch { tag, .. }
            | ValidationError::Invalid { tag, .. }
            | ValidationError::UnknownTag { tag } => *tag,
        }
    }

    /// Human readable reason without the tag prefix.
    pub fn reason(&self) -> String {
        match self {
            ValidationError::ShapeMismatch {
                expected, found, ..
            } => format!("expected {}, found {}", expected, found),
            ValidationError::Invalid { reason, .. } => reason.to_string(),
            ValidationError::UnknownTag { .. } => "no handler registered".to_string(),
        }
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, ValidationError::ShapeMismatch { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a handler for tag {0} is already registered")]
    AlreadyRegistered(u64),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CborError {
    #[error("invalid cbor payload")]
    InvalidPayload,
    #[error("trailing bytes after cbor item: {0}")]
    TrailingBytes(usize),
    #[error("value nesting exceeds depth limit {limit}")]
    DepthExceeded { limit: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
