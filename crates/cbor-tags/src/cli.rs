//! Core of the `cbor-tag-check` binary, kept here so it can be unit tested.

use serde::Serialize;
use serde_json::Value;

use crate::convert::cbor_to_json;
use crate::decode::decode_validated;
use crate::error::{CborError, ValidationError};
use crate::options::{DecodeOptions, DispatchOptions};
use crate::registry::default_registry;
use crate::value::Shape;

#[derive(Debug)]
pub enum CliError {
    MissingValue(String),
    InvalidNumber(String),
    UnknownFlag(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::MissingValue(flag) => write!(f, "{flag} expects a value"),
            CliError::InvalidNumber(v) => write!(f, "not a number: {v}"),
            CliError::UnknownFlag(flag) => write!(f, "unknown flag: {flag}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Parses `[--reject-unknown] [--max-depth N]`.
pub fn parse_args<I, S>(args: I) -> Result<DecodeOptions, CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut opts = DecodeOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--reject-unknown" => opts.dispatch = DispatchOptions::reject_unknown(),
            "--max-depth" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::MissingValue("--max-depth".into()))?;
                let value = value.as_ref();
                opts.max_depth = value
                    .parse()
                    .map_err(|_| CliError::InvalidNumber(value.to_string()))?;
            }
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }
    Ok(opts)
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<Shape>,
}

impl Report {
    fn accepted(value: Value) -> Self {
        Report {
            ok: true,
            value: Some(value),
            error: None,
            tag: None,
            found: None,
        }
    }

    fn rejected(err: &CborError) -> Self {
        let (tag, found) = match err {
            CborError::Validation(
                ValidationError::ShapeMismatch { tag, found, .. }
                | ValidationError::Invalid { tag, found, .. },
            ) => (Some(*tag), Some(*found)),
            CborError::Validation(ValidationError::UnknownTag { tag }) => (Some(*tag), None),
            _ => (None, None),
        };
        Report {
            ok: false,
            value: None,
            error: Some(err.to_string()),
            tag,
            found,
        }
    }
}

/// Decodes and validates `bytes` against the standard registry.
pub fn check(bytes: &[u8], opts: &DecodeOptions) -> Report {
    match decode_validated(bytes, default_registry(), opts) {
        Ok(value) => Report::accepted(cbor_to_json(&value)),
        Err(err) => Report::rejected(&err),
    }
}
