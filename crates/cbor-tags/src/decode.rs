//! Decoding plus tag validation of whole value trees.

use std::io::Cursor;

use ciborium::value::Value as CborValue;
use tracing::trace;

use crate::error::CborError;
use crate::options::{DecodeOptions, UnknownTagPolicy};
use crate::registry::TagRegistry;

pub fn decode_cbor_value(bytes: &[u8]) -> Result<CborValue, CborError> {
    let (value, consumed) = decode_cbor_value_with_consumed(bytes)?;
    if consumed != bytes.len() {
        return Err(CborError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

pub fn decode_cbor_value_with_consumed(bytes: &[u8]) -> Result<(CborValue, usize), CborError> {
    let mut cursor = Cursor::new(bytes);
    let value = ciborium::de::from_reader::<CborValue, _>(&mut cursor)
        .map_err(|_| CborError::InvalidPayload)?;
    Ok((value, cursor.position() as usize))
}

pub fn encode_cbor_value(value: &CborValue) -> Result<Vec<u8>, CborError> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).map_err(|_| CborError::InvalidPayload)?;
    Ok(out)
}

/// Decodes exactly one CBOR item and validates every tag inside it.
pub fn decode_validated(
    bytes: &[u8],
    registry: &TagRegistry,
    opts: &DecodeOptions,
) -> Result<CborValue, CborError> {
    let value = decode_cbor_value(bytes)?;
    validate_tree(value, registry, opts)
}

/// Validates every tagged value in `value`, innermost first.
///
/// Accepted content replaces the original; with
/// [`UnknownTagPolicy::PassThrough`] tags without a handler are dropped and
/// their content kept.
pub fn validate_tree(
    value: CborValue,
    registry: &TagRegistry,
    opts: &DecodeOptions,
) -> Result<CborValue, CborError> {
    walk(value, registry, opts, 0)
}

fn walk(
    value: CborValue,
    registry: &TagRegistry,
    opts: &DecodeOptions,
    depth: usize,
) -> Result<CborValue, CborError> {
    if depth > opts.max_depth {
        return Err(CborError::DepthExceeded {
            limit: opts.max_depth,
        });
    }
    Ok(match value {
        CborValue::Array(items) => CborValue::Array(
            items
                .into_iter()
                .map(|item| walk(item, registry, opts, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        CborValue::Map(entries) => CborValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| -> Result<(CborValue, CborValue), CborError> {
                    Ok((
                        walk(k, registry, opts, depth + 1)?,
                        walk(v, registry, opts, depth + 1)?,
                    ))
                })
                .collect::<Result<_, _>>()?,
        ),
        CborValue::Tag(tag, inner) => {
            let inner = walk(*inner, registry, opts, depth + 1)?;
            let known = registry.contains(tag);
            let accepted = registry.dispatch_with(tag, inner, &opts.dispatch)?;
            if known || opts.dispatch.unknown_tags == UnknownTagPolicy::Reject {
                CborValue::Tag(tag, Box::new(accepted))
            } else {
                trace!(tag, "dropping unknown tag");
                accepted
            }
        }
        other => other,
    })
}
