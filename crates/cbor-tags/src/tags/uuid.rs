use ciborium::value::Value as CborValue;

use super::TAG_UUID;
use crate::error::ValidationError;
use crate::filter::{LengthRange, TypeFilter};
use crate::handler::TagHandler;
use crate::value::{MajorType, Shape};

const UUID_LEN: usize = 16;

static FILTER: TypeFilter = TypeFilter::sized(MajorType::ByteString, LengthRange::exact(UUID_LEN));

/// Tag 37: binary UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidHandler;

impl TagHandler for UuidHandler {
    fn tag(&self) -> u64 {
        TAG_UUID
    }

    fn type_filter(&self) -> &TypeFilter {
        &FILTER
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        match &value {
            CborValue::Bytes(b) if b.len() == UUID_LEN => Ok(value),
            _ => Err(ValidationError::invalid(
                TAG_UUID,
                "UUID must be 16 bytes",
                Shape::of(&value),
            )),
        }
    }
}
