use std::sync::OnceLock;

use ciborium::value::Value as CborValue;

use super::TAG_EPOCH_TIMESTAMP;
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::{is_finite_number, Shape};

/// Tag 1: seconds relative to 1970-01-01T00:00Z.
///
/// The filter admits every numeric shape, NaN and infinities included; those
/// are only rejected here, as the filter has no notion of float specials.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpochTimestampHandler;

fn filter() -> &'static TypeFilter {
    static FILTER: OnceLock<TypeFilter> = OnceLock::new();
    FILTER.get_or_init(|| {
        TypeFilter::UNSIGNED_INTEGER
            .with_negative_integer()
            .with_floating_point()
    })
}

impl TagHandler for EpochTimestampHandler {
    fn tag(&self) -> u64 {
        TAG_EPOCH_TIMESTAMP
    }

    fn type_filter(&self) -> &TypeFilter {
        filter()
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        if !is_finite_number(&value) {
            return Err(ValidationError::invalid(
                TAG_EPOCH_TIMESTAMP,
                "not a valid date",
                Shape::of(&value),
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_finite_numbers() {
        let h = EpochTimestampHandler;
        for v in [
            CborValue::Integer(0.into()),
            CborValue::Integer((-1).into()),
            CborValue::Integer(u64::MAX.into()),
            CborValue::Float(1.5),
            CborValue::Float(f64::MAX),
            CborValue::Float(-f64::MAX),
        ] {
            assert!(h.type_filter().matches(&v));
            assert_eq!(h.validate(v.clone()), Ok(v));
        }
    }

    #[test]
    fn rejects_non_finite() {
        let h = EpochTimestampHandler;
        for f in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let v = CborValue::Float(f);
            assert!(h.type_filter().matches(&v));
            let err = h.validate(v).unwrap_err();
            assert_eq!(err.reason(), "not a valid date");
            assert_eq!(err.tag(), 1);
        }
    }

    #[test]
    fn filter_rejects_byte_strings() {
        assert!(!EpochTimestampHandler
            .type_filter()
            .matches(&CborValue::Bytes(vec![0, 1])));
    }
}
