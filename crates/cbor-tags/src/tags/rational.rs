use std::sync::OnceLock;

use ciborium::value::Value as CborValue;

use super::{is_integer_or_bignum, TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM, TAG_RATIONAL};
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::Shape;

fn filter() -> &'static TypeFilter {
    static FILTER: OnceLock<TypeFilter> = OnceLock::new();
    FILTER.get_or_init(|| {
        let numerator = TypeFilter::UNSIGNED_INTEGER
            .with_negative_integer()
            .with_byte_string()
            .with_tags(&[TAG_POSITIVE_BIGNUM, TAG_NEGATIVE_BIGNUM]);
        let denominator = TypeFilter::UNSIGNED_INTEGER
            .with_byte_string()
            .with_tags(&[TAG_POSITIVE_BIGNUM]);
        TypeFilter::NONE.with_array_elements(&[numerator, denominator])
    })
}

fn is_positive_denominator(value: &CborValue) -> bool {
    match value {
        CborValue::Integer(i) => i128::from(*i) > 0,
        CborValue::Tag(TAG_POSITIVE_BIGNUM, inner) => match inner.as_ref() {
            CborValue::Bytes(b) => b.iter().any(|&byte| byte != 0),
            _ => false,
        },
        _ => false,
    }
}

/// Tag 30: `[numerator, denominator]` with a positive denominator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RationalHandler;

impl RationalHandler {
    fn reject(reason: &'static str, value: &CborValue) -> ValidationError {
        ValidationError::invalid(TAG_RATIONAL, reason, Shape::of(value))
    }
}

impl TagHandler for RationalHandler {
    fn tag(&self) -> u64 {
        TAG_RATIONAL
    }

    fn type_filter(&self) -> &TypeFilter {
        filter()
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        let filter = filter();
        let CborValue::Array(items) = &value else {
            return Err(Self::reject("expected an array of two items", &value));
        };
        let [numerator, denominator] = items.as_slice() else {
            return Err(Self::reject("expected an array of two items", &value));
        };
        if !filter.element_matches(0, numerator) || !is_integer_or_bignum(numerator) {
            return Err(Self::reject("numerator must be an integer or bignum", &value));
        }
        if !filter.element_matches(1, denominator) || !is_positive_denominator(denominator) {
            return Err(Self::reject("denominator must be a positive integer", &value));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> CborValue {
        CborValue::Integer(i.into())
    }

    fn pair(a: CborValue, b: CborValue) -> CborValue {
        CborValue::Array(vec![a, b])
    }

    #[test]
    fn accepts_valid_fractions() {
        let big = CborValue::Tag(2, Box::new(CborValue::Bytes(vec![0, 1])));
        for v in [
            pair(int(1), int(3)),
            pair(int(-7), int(2)),
            pair(int(0), int(1)),
            pair(CborValue::Tag(3, Box::new(CborValue::Bytes(vec![9]))), big),
        ] {
            assert!(RationalHandler.type_filter().matches(&v));
            assert_eq!(RationalHandler.validate(v.clone()), Ok(v));
        }
    }

    #[test]
    fn rejects_zero_or_negative_denominator() {
        let zero_big = CborValue::Tag(2, Box::new(CborValue::Bytes(vec![0, 0])));
        for v in [
            pair(int(1), int(0)),
            pair(int(1), int(-2)),
            pair(int(1), zero_big),
            pair(int(1), CborValue::Tag(3, Box::new(CborValue::Bytes(vec![1])))),
        ] {
            let err = RationalHandler.validate(v).unwrap_err();
            assert_eq!(err.reason(), "denominator must be a positive integer");
        }
    }

    #[test]
    fn rejects_bad_numerator() {
        let err = RationalHandler
            .validate(pair(CborValue::Float(0.5), int(2)))
            .unwrap_err();
        assert_eq!(err.reason(), "numerator must be an integer or bignum");
    }
}
