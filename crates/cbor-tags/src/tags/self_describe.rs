use ciborium::value::Value as CborValue;

use super::TAG_SELF_DESCRIBE;
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;

static FILTER: TypeFilter = TypeFilter::ANY;

/// Tag 55799: self-described CBOR marker. Content is unconstrained.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfDescribeHandler;

impl TagHandler for SelfDescribeHandler {
    fn tag(&self) -> u64 {
        TAG_SELF_DESCRIBE
    }

    fn type_filter(&self) -> &TypeFilter {
        &FILTER
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        Ok(value)
    }
}
