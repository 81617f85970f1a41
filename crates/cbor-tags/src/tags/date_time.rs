use chrono::DateTime;
use ciborium::value::Value as CborValue;

use super::TAG_DATE_TIME_STRING;
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::Shape;

static FILTER: TypeFilter = TypeFilter::TEXT_STRING;

/// Tag 0: RFC 3339 date/time string, e.g. `2013-03-21T20:04:00Z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeStringHandler;

impl TagHandler for DateTimeStringHandler {
    fn tag(&self) -> u64 {
        TAG_DATE_TIME_STRING
    }

    fn type_filter(&self) -> &TypeFilter {
        &FILTER
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        let valid = match &value {
            CborValue::Text(s) => DateTime::parse_from_rfc3339(s).is_ok(),
            _ => false,
        };
        if !valid {
            return Err(ValidationError::invalid(
                TAG_DATE_TIME_STRING,
                "not a valid date/time string",
                Shape::of(&value),
            ));
        }
        Ok(value)
    }
}
