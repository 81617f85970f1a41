//! Handlers for the well-known CBOR tags.
//!
//! | tag   | handler                     | content                          |
//! |-------|-----------------------------|----------------------------------|
//! | 0     | [`DateTimeStringHandler`]   | RFC 3339 text                    |
//! | 1     | [`EpochTimestampHandler`]   | finite number of seconds         |
//! | 2, 3  | [`BignumHandler`]           | big-endian magnitude bytes       |
//! | 4, 5  | [`DecimalFractionHandler`]  | `[exponent, mantissa]`           |
//! | 30    | [`RationalHandler`]         | `[numerator, denominator]`       |
//! | 32    | [`UriHandler`]              | absolute URI text                |
//! | 37    | [`UuidHandler`]             | 16 bytes                         |
//! | 55799 | [`SelfDescribeHandler`]     | anything                         |

mod bignum;
mod date_time;
mod decimal;
mod epoch;
mod rational;
mod self_describe;
mod uri;
mod uuid;

use std::sync::Arc;

use ciborium::value::Value as CborValue;

use crate::handler::TagHandler;

pub use bignum::BignumHandler;
pub use date_time::DateTimeStringHandler;
pub use decimal::DecimalFractionHandler;
pub use epoch::EpochTimestampHandler;
pub use rational::RationalHandler;
pub use self_describe::SelfDescribeHandler;
pub use uri::UriHandler;
pub use uuid::UuidHandler;

pub const TAG_DATE_TIME_STRING: u64 = 0;
pub const TAG_EPOCH_TIMESTAMP: u64 = 1;
pub const TAG_POSITIVE_BIGNUM: u64 = 2;
pub const TAG_NEGATIVE_BIGNUM: u64 = 3;
pub const TAG_DECIMAL_FRACTION: u64 = 4;
pub const TAG_BIGFLOAT: u64 = 5;
pub const TAG_RATIONAL: u64 = 30;
pub const TAG_URI: u64 = 32;
pub const TAG_UUID: u64 = 37;
pub const TAG_SELF_DESCRIBE: u64 = 55799;

/// One instance of every bundled handler.
pub fn standard_handlers() -> Vec<Arc<dyn TagHandler>> {
    vec![
        Arc::new(DateTimeStringHandler),
        Arc::new(EpochTimestampHandler),
        Arc::new(BignumHandler::positive()),
        Arc::new(BignumHandler::negative()),
        Arc::new(DecimalFractionHandler::decimal()),
        Arc::new(DecimalFractionHandler::bigfloat()),
        Arc::new(RationalHandler),
        Arc::new(UriHandler),
        Arc::new(UuidHandler),
        Arc::new(SelfDescribeHandler),
    ]
}

/// Plain integer, or a tag 2/3 bignum wrapping a byte string.
pub(crate) fn is_integer_or_bignum(value: &CborValue) -> bool {
    match value {
        CborValue::Integer(_) => true,
        CborValue::Tag(TAG_POSITIVE_BIGNUM | TAG_NEGATIVE_BIGNUM, inner) => {
            matches!(inner.as_ref(), CborValue::Bytes(_))
        }
        _ => false,
    }
}
