/// What dispatch does with a tag that has no registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Drop the tag and keep the content as an untagged value.
    #[default]
    PassThrough,
    /// Fail with [`crate::ValidationError::UnknownTag`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
    pub unknown_tags: UnknownTagPolicy,
}

impl DispatchOptions {
    pub fn reject_unknown() -> Self {
        Self {
            unknown_tags: UnknownTagPolicy::Reject,
        }
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits for walking a decoded value tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest array/map/tag nesting that is walked before giving up.
    pub max_depth: usize,
    pub dispatch: DispatchOptions,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            dispatch: DispatchOptions::default(),
        }
    }
}
