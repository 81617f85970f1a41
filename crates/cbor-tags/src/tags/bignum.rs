use ciborium::value::Value as CborValue;

use super::{TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM};
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::Shape;

static FILTER: TypeFilter = TypeFilter::BYTE_STRING;

/// Tags 2 and 3: unsigned big-endian magnitude. Tag 3 encodes `-1 - n`.
///
/// Every byte string is a valid magnitude, including the empty one (zero).
#[derive(Debug, Clone, Copy)]
pub struct BignumHandler {
    tag: u64,
}

impl BignumHandler {
    pub const fn positive() -> Self {
        Self {
            tag: TAG_POSITIVE_BIGNUM,
        }
    }

    pub const fn negative() -> Self {
        Self {
            tag: TAG_NEGATIVE_BIGNUM,
        }
    }
}

impl TagHandler for BignumHandler {
    fn tag(&self) -> u64 {
        self.tag
    }

    fn type_filter(&self) -> &TypeFilter {
        &FILTER
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        match value {
            CborValue::Bytes(_) => Ok(value),
            other => Err(ValidationError::invalid(
                self.tag,
                "bignum must be a byte string",
                Shape::of(&other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_bytes() {
        for bytes in [vec![], vec![0], vec![0xff; 40]] {
            let v = CborValue::Bytes(bytes);
            assert_eq!(BignumHandler::positive().validate(v.clone()), Ok(v.clone()));
            assert_eq!(BignumHandler::negative().validate(v.clone()), Ok(v));
        }
    }

    #[test]
    fn defensive_shape_check() {
        let err = BignumHandler::negative()
            .validate(CborValue::Integer(1.into()))
            .unwrap_err();
        assert_eq!(err.tag(), 3);
    }
}
