//! The tag handler extension point.

use ciborium::value::Value as CborValue;

use crate::error::ValidationError;
use crate::filter::TypeFilter;

/// Semantics for exactly one tag number.
///
/// Handlers are stateless: the same instance is shared across every decode,
/// possibly from several threads at once, hence the `Send + Sync` bound.
///
/// Validation runs in two phases. The dispatcher first checks
/// [`TagHandler::type_filter`] against the raw content and only calls
/// [`TagHandler::validate`] when the shape fits. A filter may deliberately
/// admit more than the tag allows (NaN for a timestamp, say); `validate` is
/// where those are turned away.
pub trait TagHandler: Send + Sync {
    fn tag(&self) -> u64;

    /// Acceptable raw shapes. Must return an equivalent filter on every call.
    fn type_filter(&self) -> &TypeFilter;

    /// Full semantic check of content that already passed the type filter.
    ///
    /// Returns the accepted content, either unchanged or normalized to an
    /// equivalent value. Must be pure: no I/O, no shared mutable state.
    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError>;
}
