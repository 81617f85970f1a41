use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ciborium::value::Value as CborValue;
use serde_json::{json, Map, Number, Value};

/// Lossy JSON view of a CBOR value, for reports.
///
/// - byte strings become base64 `data:` URIs
/// - tags become `{"tag": n, "value": ...}`
/// - NaN and infinities become the strings `"NaN"`, `"Infinity"`, `"-Infinity"`
/// - non-text map keys are rendered as their JSON text
pub fn cbor_to_json(v: &CborValue) -> Value {
    match v {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(*b),
        CborValue::Integer(i) => {
            let n: i128 = (*i).into();
            if let Ok(u) = u64::try_from(n) {
                Value::Number(Number::from(u))
            } else if let Ok(s) = i64::try_from(n) {
                Value::Number(Number::from(s))
            } else {
                Value::String(n.to_string())
            }
        }
        CborValue::Float(f) => match Number::from_f64(*f) {
            Some(n) => Value::Number(n),
            None if f.is_nan() => Value::String("NaN".into()),
            None if *f > 0.0 => Value::String("Infinity".into()),
            None => Value::String("-Infinity".into()),
        },
        CborValue::Text(s) => Value::String(s.clone()),
        CborValue::Bytes(bytes) => Value::String(format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(bytes)
        )),
        CborValue::Array(items) => Value::Array(items.iter().map(cbor_to_json).collect()),
        CborValue::Map(entries) => {
            let mut out = Map::new();
            for (k, v) in entries {
                let key = match k {
                    CborValue::Text(s) => s.clone(),
                    other => cbor_to_json(other).to_string(),
                };
                out.insert(key, cbor_to_json(v));
            }
            Value::Object(out)
        }
        CborValue::Tag(tag, inner) => json!({ "tag": tag, "value": cbor_to_json(inner) }),
        _ => Value::Null,
    }
}
