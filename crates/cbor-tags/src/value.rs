//! Read-only view over decoded [`CborValue`]s.
//!
//! Tag validation never builds raw values; it only asks a handful of
//! questions about them (major type, finiteness, length, outer tag). Those
//! questions live here so the filter and the handlers agree on the answers.

use std::fmt;

use ciborium::value::Value as CborValue;
use serde::Serialize;

/// Coarse structural category of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorType {
    UnsignedInteger,
    NegativeInteger,
    ByteString,
    TextString,
    Array,
    Map,
    FloatingPoint,
    Boolean,
    Null,
}

impl MajorType {
    pub const ALL: [MajorType; 9] = [
        MajorType::UnsignedInteger,
        MajorType::NegativeInteger,
        MajorType::ByteString,
        MajorType::TextString,
        MajorType::Array,
        MajorType::Map,
        MajorType::FloatingPoint,
        MajorType::Boolean,
        MajorType::Null,
    ];

    /// Bit used for this category inside a filter's acceptance set.
    pub(crate) const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Whether values of this category carry a length.
    pub const fn is_sized(self) -> bool {
        matches!(
            self,
            MajorType::ByteString | MajorType::TextString | MajorType::Array | MajorType::Map
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            MajorType::UnsignedInteger => "unsigned integer",
            MajorType::NegativeInteger => "negative integer",
            MajorType::ByteString => "byte string",
            MajorType::TextString => "text string",
            MajorType::Array => "array",
            MajorType::Map => "map",
            MajorType::FloatingPoint => "floating point",
            MajorType::Boolean => "boolean",
            MajorType::Null => "null",
        }
    }
}

impl fmt::Display for MajorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strips every tag wrapping `value` and returns the innermost content.
pub fn untagged(value: &CborValue) -> &CborValue {
    let mut current = value;
    while let CborValue::Tag(_, inner) = current {
        current = inner;
    }
    current
}

/// Major type of the value's untagged content.
pub fn major_type(value: &CborValue) -> MajorType {
    match untagged(value) {
        CborValue::Integer(i) => {
            if i128::from(*i) < 0 {
                MajorType::NegativeInteger
            } else {
                MajorType::UnsignedInteger
            }
        }
        CborValue::Float(_) => MajorType::FloatingPoint,
        CborValue::Bytes(_) => MajorType::ByteString,
        CborValue::Text(_) => MajorType::TextString,
        CborValue::Array(_) => MajorType::Array,
        CborValue::Map(_) => MajorType::Map,
        CborValue::Bool(_) => MajorType::Boolean,
        _ => MajorType::Null,
    }
}

/// `true` for every integer and for floats that are neither NaN nor infinite.
pub fn is_finite_number(value: &CborValue) -> bool {
    match untagged(value) {
        CborValue::Integer(_) => true,
        CborValue::Float(f) => f.is_finite(),
        _ => false,
    }
}

/// Byte length of strings, item count of arrays, entry count of maps.
pub fn length(value: &CborValue) -> Option<usize> {
    match untagged(value) {
        CborValue::Bytes(b) => Some(b.len()),
        CborValue::Text(s) => Some(s.len()),
        CborValue::Array(items) => Some(items.len()),
        CborValue::Map(entries) => Some(entries.len()),
        _ => None,
    }
}

pub fn outer_tag(value: &CborValue) -> Option<u64> {
    match value {
        CborValue::Tag(tag, _) => Some(*tag),
        _ => None,
    }
}

pub fn is_tagged(value: &CborValue) -> bool {
    outer_tag(value).is_some()
}

/// Compact description of a value used in error messages and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub major: MajorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u64>,
}

impl Shape {
    pub fn of(value: &CborValue) -> Self {
        Shape {
            major: major_type(value),
            len: length(value),
            tag: outer_tag(value),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag {
            write!(f, "tag {} ", tag)?;
        }
        match self.len {
            Some(len) => write!(f, "{}({})", self.major, len),
            None => write!(f, "{}", self.major),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_integers_by_sign() {
        assert_eq!(major_type(&CborValue::Integer(0.into())), MajorType::UnsignedInteger);
        assert_eq!(major_type(&CborValue::Integer(u64::MAX.into())), MajorType::UnsignedInteger);
        assert_eq!(major_type(&CborValue::Integer((-1i64).into())), MajorType::NegativeInteger);
    }

    #[test]
    fn tagged_values_report_inner_type() {
        let v = CborValue::Tag(2, Box::new(CborValue::Bytes(vec![1, 2, 3])));
        assert_eq!(major_type(&v), MajorType::ByteString);
        assert_eq!(length(&v), Some(3));
        assert_eq!(outer_tag(&v), Some(2));
        assert!(is_tagged(&v));
    }

    #[test]
    fn finiteness() {
        assert!(is_finite_number(&CborValue::Integer(7.into())));
        assert!(is_finite_number(&CborValue::Float(f64::MAX)));
        assert!(!is_finite_number(&CborValue::Float(f64::NAN)));
        assert!(!is_finite_number(&CborValue::Float(f64::NEG_INFINITY)));
        assert!(!is_finite_number(&CborValue::Text("1".into())));
    }

    #[test]
    fn text_length_counts_utf8_bytes() {
        assert_eq!(length(&CborValue::Text("€".into())), Some(3));
        assert_eq!(length(&CborValue::Bool(true)), None);
    }

    #[test]
    fn shape_display() {
        let arr = CborValue::Array(vec![CborValue::Null; 3]);
        assert_eq!(Shape::of(&arr).to_string(), "array(3)");
        let tagged = CborValue::Tag(2, Box::new(CborValue::Bytes(vec![0; 8])));
        assert_eq!(Shape::of(&tagged).to_string(), "tag 2 byte string(8)");
        assert_eq!(Shape::of(&CborValue::Float(1.5)).to_string(), "floating point");
    }
}
