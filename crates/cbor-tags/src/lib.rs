//! Semantic tag validation for decoded CBOR values.
//!
//! A CBOR tag reinterprets the value it wraps: `1(1577836800)` is a
//! timestamp, `2(h'0100')` a big integer, `32("http://…")` a URI. This crate
//! decides whether tagged content is acceptable, in two phases:
//!
//! 1. a cheap shape check against the handler's [`TypeFilter`], which only
//!    reads the content's major type, length and outer tags;
//! 2. the handler's [`TagHandler::validate`], which checks the semantics.
//!
//! Handlers are registered per tag number in a [`TagRegistry`]. Third-party
//! tags plug in by implementing [`TagHandler`].
//!
//! # Example
//!
//! ```
//! use cbor_tags::{default_registry, ValidationError};
//! use ciborium::value::Value;
//!
//! let registry = default_registry();
//! let ts = Value::Integer(1_577_836_800.into());
//! assert_eq!(registry.dispatch(1, ts.clone()), Ok(ts));
//!
//! let err = registry.dispatch(1, Value::Float(f64::NAN)).unwrap_err();
//! assert_eq!(err.reason(), "not a valid date");
//!
//! let err = registry.dispatch(1, Value::Array(vec![])).unwrap_err();
//! assert!(matches!(err, ValidationError::ShapeMismatch { .. }));
//! ```

pub mod cli;
pub mod convert;
pub mod decode;
pub mod error;
pub mod filter;
pub mod handler;
pub mod options;
pub mod registry;
pub mod tags;
pub mod value;

pub use convert::cbor_to_json;
pub use decode::{
    decode_cbor_value, decode_cbor_value_with_consumed, decode_validated, encode_cbor_value,
    validate_tree,
};
pub use error::{CborError, RegistryError, ValidationError};
pub use filter::{LengthRange, TagAllowance, TypeFilter};
pub use handler::TagHandler;
pub use options::{DecodeOptions, DispatchOptions, UnknownTagPolicy, DEFAULT_MAX_DEPTH};
pub use registry::{default_registry, HandlerMap, TagRegistry};
pub use value::{is_finite_number, is_tagged, length, major_type, outer_tag, MajorType, Shape};
