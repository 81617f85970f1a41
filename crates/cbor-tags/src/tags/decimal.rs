use std::sync::OnceLock;

use ciborium::value::Value as CborValue;

use super::{is_integer_or_bignum, TAG_BIGFLOAT, TAG_DECIMAL_FRACTION, TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM};
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::Shape;

fn filter() -> &'static TypeFilter {
    static FILTER: OnceLock<TypeFilter> = OnceLock::new();
    FILTER.get_or_init(|| {
        let exponent = TypeFilter::UNSIGNED_INTEGER.with_negative_integer();
        let mantissa = exponent
            .with_byte_string()
            .with_tags(&[TAG_POSITIVE_BIGNUM, TAG_NEGATIVE_BIGNUM]);
        TypeFilter::NONE.with_array_elements(&[exponent, mantissa])
    })
}

/// Tags 4 and 5: `[exponent, mantissa]` meaning `mantissa * 10^exponent`
/// (decimal fraction) or `mantissa * 2^exponent` (bigfloat).
///
/// The exponent is a plain integer; the mantissa may also be a bignum.
#[derive(Debug, Clone, Copy)]
pub struct DecimalFractionHandler {
    tag: u64,
}

impl DecimalFractionHandler {
    pub const fn decimal() -> Self {
        Self {
            tag: TAG_DECIMAL_FRACTION,
        }
    }

    pub const fn bigfloat() -> Self {
        Self { tag: TAG_BIGFLOAT }
    }

    fn reject(&self, reason: &'static str, value: &CborValue) -> ValidationError {
        ValidationError::invalid(self.tag, reason, Shape::of(value))
    }
}

impl TagHandler for DecimalFractionHandler {
    fn tag(&self) -> u64 {
        self.tag
    }

    fn type_filter(&self) -> &TypeFilter {
        filter()
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        let filter = filter();
        let CborValue::Array(items) = &value else {
            return Err(self.reject("expected an array of two items", &value));
        };
        let [exponent, mantissa] = items.as_slice() else {
            return Err(self.reject("expected an array of two items", &value));
        };
        if !filter.element_matches(0, exponent) || !matches!(exponent, CborValue::Integer(_)) {
            return Err(self.reject("exponent must be an integer", &value));
        }
        if !filter.element_matches(1, mantissa) || !is_integer_or_bignum(mantissa) {
            return Err(self.reject("mantissa must be an integer or bignum", &value));
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

    fn bignum(tag: u64, bytes: &[u8]) -> CborValue {
        CborValue::Tag(tag, Box::new(CborValue::Bytes(bytes.to_vec())))
    }

    #[test]
    fn accepts_integer_and_bignum_mantissa() {
        let h = DecimalFractionHandler::decimal();
        for v in [
            CborValue::Array(vec![int(-2), int(27315)]),
            CborValue::Array(vec![int(0), int(-1)]),
            CborValue::Array(vec![int(5), bignum(2, &[1, 0, 0, 0, 0, 0, 0, 0, 0])]),
            CborValue::Array(vec![int(-5), bignum(3, &[0xff])]),
        ] {
            assert!(h.type_filter().matches(&v), "{:?}", v);
            assert_eq!(h.validate(v.clone()), Ok(v));
        }
    }

    #[test]
    fn filter_checks_arity() {
        let h = DecimalFractionHandler::bigfloat();
        assert!(!h.type_filter().matches(&CborValue::Array(vec![int(1)])));
        assert!(!h
            .type_filter()
            .matches(&CborValue::Array(vec![int(1), int(2), int(3)])));
        assert!(!h.type_filter().matches(&int(1)));
    }

    #[test]
    fn rejects_bad_elements() {
        let h = DecimalFractionHandler::decimal();
        let err = h
            .validate(CborValue::Array(vec![CborValue::Float(1.0), int(1)]))
            .unwrap_err();
        assert_eq!(err.reason(), "exponent must be an integer");

        let err = h
            .validate(CborValue::Array(vec![bignum(2, &[1]), int(1)]))
            .unwrap_err();
        assert_eq!(err.reason(), "exponent must be an integer");

        let err = h
            .validate(CborValue::Array(vec![int(1), CborValue::Text("1".into())]))
            .unwrap_err();
        assert_eq!(err.reason(), "mantissa must be an integer or bignum");

        // Untagged bytes fit the element filter but are not a bignum.
        let err = h
            .validate(CborValue::Array(vec![int(1), CborValue::Bytes(vec![1])]))
            .unwrap_err();
        assert_eq!(err.reason(), "mantissa must be an integer or bignum");

        let err = h
            .validate(CborValue::Array(vec![int(1), bignum(30, &[1])]))
            .unwrap_err();
        assert_eq!(err.tag(), 4);
    }
}
