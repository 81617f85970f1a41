//! `TypeFilter`: cheap, composable shape predicate for tagged content.
//!
//! A filter is an immutable acceptance set over [`MajorType`]s, with optional
//! inclusive length bounds for sized categories, optional per-index element
//! filters for fixed-shape arrays, and a set of nested tags it tolerates.
//!
//! Filters only ever widen: every `with_*` combinator is a [`TypeFilter::union`]
//! with a base filter, so composition is order independent and a filter that
//! is shared between handlers can never be narrowed by another caller.
//!
//! ```
//! use cbor_tags::TypeFilter;
//! use ciborium::value::Value;
//!
//! let numeric = TypeFilter::UNSIGNED_INTEGER
//!     .with_negative_integer()
//!     .with_floating_point();
//! assert!(numeric.matches(&Value::Float(1.5)));
//! assert!(!numeric.matches(&Value::Bytes(vec![])));
//! ```

use std::fmt;
use std::sync::Arc;

use ciborium::value::Value as CborValue;

use crate::value::{length, major_type, MajorType};

/// Inclusive length interval. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl LengthRange {
    pub const ANY: LengthRange = LengthRange { min: 0, max: None };

    pub const fn new(min: usize, max: Option<usize>) -> Self {
        LengthRange { min, max }
    }

    pub const fn exact(len: usize) -> Self {
        LengthRange {
            min: len,
            max: Some(len),
        }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && self.max.map_or(true, |max| len <= max)
    }

    /// Smallest range containing both `self` and `other`.
    pub fn hull(&self, other: &LengthRange) -> LengthRange {
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        LengthRange {
            min: self.min.min(other.min),
            max,
        }
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "{}..", self.min),
        }
    }
}

/// Which tags a value may itself carry and still match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAllowance {
    /// Tagged content is rejected.
    None,
    /// Only the listed tags (sorted, deduplicated).
    Only(Arc<[u64]>),
    Any,
}

impl TagAllowance {
    pub fn allows(&self, tag: u64) -> bool {
        match self {
            TagAllowance::None => false,
            TagAllowance::Only(tags) => tags.binary_search(&tag).is_ok(),
            TagAllowance::Any => true,
        }
    }

    fn union(&self, other: &TagAllowance) -> TagAllowance {
        match (self, other) {
            (TagAllowance::Any, _) | (_, TagAllowance::Any) => TagAllowance::Any,
            (TagAllowance::None, x) | (x, TagAllowance::None) => x.clone(),
            (TagAllowance::Only(a), TagAllowance::Only(b)) => {
                let mut tags: Vec<u64> = a.iter().chain(b.iter()).copied().collect();
                tags.sort_unstable();
                tags.dedup();
                TagAllowance::Only(tags.into())
            }
        }
    }
}

// Slots in `TypeFilter::lengths`.
const fn length_slot(major: MajorType) -> Option<usize> {
    match major {
        MajorType::ByteString => Some(0),
        MajorType::TextString => Some(1),
        MajorType::Array => Some(2),
        MajorType::Map => Some(3),
        _ => None,
    }
}

const ALL_TYPES: u16 = (1 << MajorType::ALL.len()) - 1;

/// Immutable shape predicate. Cheap to clone; element and tag lists are
/// reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    types: u16,
    lengths: [LengthRange; 4],
    elements: Option<Arc<[TypeFilter]>>,
    tags: TagAllowance,
}

impl TypeFilter {
    /// Accepts nothing.
    pub const NONE: TypeFilter = TypeFilter {
        types: 0,
        lengths: [LengthRange::ANY; 4],
        elements: None,
        tags: TagAllowance::None,
    };

    /// Accepts every value, including arbitrarily tagged ones.
    pub const ANY: TypeFilter = TypeFilter {
        types: ALL_TYPES,
        lengths: [LengthRange::ANY; 4],
        elements: None,
        tags: TagAllowance::Any,
    };

    pub const UNSIGNED_INTEGER: TypeFilter = TypeFilter::base(MajorType::UnsignedInteger);
    pub const NEGATIVE_INTEGER: TypeFilter = TypeFilter::base(MajorType::NegativeInteger);
    pub const BYTE_STRING: TypeFilter = TypeFilter::base(MajorType::ByteString);
    pub const TEXT_STRING: TypeFilter = TypeFilter::base(MajorType::TextString);
    pub const ARRAY: TypeFilter = TypeFilter::base(MajorType::Array);
    pub const MAP: TypeFilter = TypeFilter::base(MajorType::Map);
    pub const FLOATING_POINT: TypeFilter = TypeFilter::base(MajorType::FloatingPoint);
    pub const BOOLEAN: TypeFilter = TypeFilter::base(MajorType::Boolean);
    pub const NULL: TypeFilter = TypeFilter::base(MajorType::Null);

    /// Filter accepting exactly one category, any length, no nested tags.
    pub const fn base(major: MajorType) -> Self {
        TypeFilter {
            types: major.bit(),
            lengths: [LengthRange::ANY; 4],
            elements: None,
            tags: TagAllowance::None,
        }
    }

    /// Filter accepting one sized category within `range`.
    pub const fn sized(major: MajorType, range: LengthRange) -> Self {
        let mut lengths = [LengthRange::ANY; 4];
        if let Some(slot) = length_slot(major) {
            lengths[slot] = range;
        }
        TypeFilter {
            types: major.bit(),
            lengths,
            elements: None,
            tags: TagAllowance::None,
        }
    }

    /// Everything accepted by `self` or by `other`.
    pub fn union(&self, other: &TypeFilter) -> TypeFilter {
        let mut lengths = [LengthRange::ANY; 4];
        for major in MajorType::ALL {
            let Some(slot) = length_slot(major) else {
                continue;
            };
            lengths[slot] = match (self.accepts(major), other.accepts(major)) {
                (true, true) => self.lengths[slot].hull(&other.lengths[slot]),
                (true, false) => self.lengths[slot],
                (false, true) => other.lengths[slot],
                (false, false) => LengthRange::ANY,
            };
        }
        let elements = match (self.accepts(MajorType::Array), other.accepts(MajorType::Array)) {
            (true, true) => merge_elements(self.elements.as_deref(), other.elements.as_deref()),
            (true, false) => self.elements.clone(),
            (false, true) => other.elements.clone(),
            (false, false) => None,
        };
        TypeFilter {
            types: self.types | other.types,
            lengths,
            elements,
            tags: self.tags.union(&other.tags),
        }
    }

    pub fn with_unsigned_integer(&self) -> TypeFilter {
        self.union(&TypeFilter::UNSIGNED_INTEGER)
    }

    pub fn with_negative_integer(&self) -> TypeFilter {
        self.union(&TypeFilter::NEGATIVE_INTEGER)
    }

    pub fn with_floating_point(&self) -> TypeFilter {
        self.union(&TypeFilter::FLOATING_POINT)
    }

    pub fn with_byte_string(&self) -> TypeFilter {
        self.union(&TypeFilter::BYTE_STRING)
    }

    pub fn with_byte_string_length(&self, min: usize, max: usize) -> TypeFilter {
        self.union(&TypeFilter::sized(
            MajorType::ByteString,
            LengthRange::new(min, Some(max)),
        ))
    }

    pub fn with_text_string(&self) -> TypeFilter {
        self.union(&TypeFilter::TEXT_STRING)
    }

    pub fn with_text_string_length(&self, min: usize, max: usize) -> TypeFilter {
        self.union(&TypeFilter::sized(
            MajorType::TextString,
            LengthRange::new(min, Some(max)),
        ))
    }

    pub fn with_array_any_length(&self) -> TypeFilter {
        self.union(&TypeFilter::ARRAY)
    }

    pub fn with_array(&self, min: usize, max: usize) -> TypeFilter {
        self.union(&TypeFilter::sized(
            MajorType::Array,
            LengthRange::new(min, Some(max)),
        ))
    }

    pub fn with_array_exact_length(&self, len: usize) -> TypeFilter {
        self.union(&TypeFilter::sized(MajorType::Array, LengthRange::exact(len)))
    }

    /// Arrays of exactly `elements.len()` items, item `i` constrained by
    /// `elements[i]`. Element filters are consulted by handlers through
    /// [`TypeFilter::element_matches`]; [`TypeFilter::matches`] only checks the
    /// array's length.
    pub fn with_array_elements(&self, elements: &[TypeFilter]) -> TypeFilter {
        let mut arr = TypeFilter::sized(MajorType::Array, LengthRange::exact(elements.len()));
        arr.elements = Some(elements.into());
        self.union(&arr)
    }

    pub fn with_map(&self) -> TypeFilter {
        self.union(&TypeFilter::MAP)
    }

    pub fn with_boolean(&self) -> TypeFilter {
        self.union(&TypeFilter::BOOLEAN)
    }

    pub fn with_null(&self) -> TypeFilter {
        self.union(&TypeFilter::NULL)
    }

    /// Also accept content wrapped in any of `tags`.
    pub fn with_tags(&self, tags: &[u64]) -> TypeFilter {
        let mut sorted = tags.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut tagged = TypeFilter::NONE;
        tagged.tags = TagAllowance::Only(sorted.into());
        self.union(&tagged)
    }

    pub fn with_any_tag(&self) -> TypeFilter {
        let mut tagged = TypeFilter::NONE;
        tagged.tags = TagAllowance::Any;
        self.union(&tagged)
    }

    pub fn accepts(&self, major: MajorType) -> bool {
        self.types & major.bit() != 0
    }

    pub fn allows_tag(&self, tag: u64) -> bool {
        self.tags.allows(tag)
    }

    pub fn tag_allowance(&self) -> &TagAllowance {
        &self.tags
    }

    /// Length bounds for an accepted sized category.
    pub fn length_range(&self, major: MajorType) -> Option<LengthRange> {
        let slot = length_slot(major)?;
        self.accepts(major).then_some(self.lengths[slot])
    }

    /// Element filter for array index `index`, `None` when unconstrained.
    pub fn element(&self, index: usize) -> Option<&TypeFilter> {
        self.elements.as_deref().and_then(|e| e.get(index))
    }

    pub fn element_matches(&self, index: usize, value: &CborValue) -> bool {
        self.element(index).map_or(true, |f| f.matches(value))
    }

    /// Shape check. Reads only the outer tags, major type and length, so the
    /// cost does not depend on the size of the value. Never panics.
    pub fn matches(&self, value: &CborValue) -> bool {
        let mut current = value;
        while let CborValue::Tag(tag, inner) = current {
            if !self.tags.allows(*tag) {
                return false;
            }
            current = inner;
        }
        let major = major_type(current);
        if !self.accepts(major) {
            return false;
        }
        match (length_slot(major), length(current)) {
            (Some(slot), Some(len)) => self.lengths[slot].contains(len),
            _ => true,
        }
    }
}

impl Default for TypeFilter {
    fn default() -> Self {
        TypeFilter::NONE
    }
}

// Index-wise union over the common prefix. Indices past the shorter list are
// left unconstrained, which keeps the result a superset of both inputs.
fn merge_elements(a: Option<&[TypeFilter]>, b: Option<&[TypeFilter]>) -> Option<Arc<[TypeFilter]>> {
    let (a, b) = (a?, b?);
    let merged: Vec<TypeFilter> = a.iter().zip(b.iter()).map(|(x, y)| x.union(y)).collect();
    Some(merged.into())
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.types == 0 {
            return f.write_str("nothing");
        }
        let mut first = true;
        for major in MajorType::ALL {
            if !self.accepts(major) {
                continue;
            }
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            write!(f, "{}", major)?;
            if let Some(range) = self.length_range(major) {
                if range != LengthRange::ANY {
                    write!(f, "({})", range)?;
                }
            }
        }
        match &self.tags {
            TagAllowance::None => Ok(()),
            TagAllowance::Any => f.write_str(", any tag"),
            TagAllowance::Only(tags) => {
                let list: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
                write!(f, ", tags [{}]", list.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> CborValue {
        CborValue::Integer(i.into())
    }

    fn numeric() -> TypeFilter {
        TypeFilter::UNSIGNED_INTEGER
            .with_negative_integer()
            .with_floating_point()
    }

    #[test]
    fn base_filter_accepts_one_category() {
        let f = TypeFilter::UNSIGNED_INTEGER;
        assert!(f.matches(&int(5)));
        assert!(!f.matches(&int(-5)));
        assert!(!f.matches(&CborValue::Float(5.0)));
    }

    #[test]
    fn numeric_filter_admits_special_floats() {
        let f = numeric();
        assert!(f.matches(&int(0)));
        assert!(f.matches(&int(-1)));
        assert!(f.matches(&CborValue::Float(f64::NAN)));
        assert!(f.matches(&CborValue::Float(f64::INFINITY)));
        assert!(!f.matches(&CborValue::Bytes(vec![1])));
        assert!(!f.matches(&CborValue::Array(vec![int(1), int(2), int(3)])));
    }

    #[test]
    fn combinators_do_not_mutate_receiver() {
        let base = TypeFilter::TEXT_STRING;
        let wider = base.with_byte_string();
        assert!(!base.matches(&CborValue::Bytes(vec![])));
        assert!(wider.matches(&CborValue::Bytes(vec![])));
        assert_eq!(base, TypeFilter::TEXT_STRING);
    }

    #[test]
    fn array_length_bounds() {
        let f = TypeFilter::NONE.with_array(1, 2);
        assert!(!f.matches(&CborValue::Array(vec![])));
        assert!(f.matches(&CborValue::Array(vec![int(1)])));
        assert!(f.matches(&CborValue::Array(vec![int(1), int(2)])));
        assert!(!f.matches(&CborValue::Array(vec![int(1), int(2), int(3)])));
    }

    #[test]
    fn union_of_bounds_takes_hull() {
        let f = TypeFilter::NONE
            .with_array_exact_length(2)
            .with_array_exact_length(4);
        assert_eq!(f.length_range(MajorType::Array), Some(LengthRange::new(2, Some(4))));
        let g = f.with_array_any_length();
        assert_eq!(g.length_range(MajorType::Array), Some(LengthRange::ANY));
    }

    #[test]
    fn byte_string_length() {
        let f = TypeFilter::NONE.with_byte_string_length(16, 16);
        assert!(f.matches(&CborValue::Bytes(vec![0; 16])));
        assert!(!f.matches(&CborValue::Bytes(vec![0; 15])));
        assert!(!f.matches(&CborValue::Text("x".repeat(16))));
    }

    #[test]
    fn nested_tags_rejected_unless_allowed() {
        let bignum = CborValue::Tag(2, Box::new(CborValue::Bytes(vec![1])));
        assert!(!TypeFilter::BYTE_STRING.matches(&bignum));
        assert!(TypeFilter::BYTE_STRING.with_tags(&[2, 3]).matches(&bignum));
        assert!(!TypeFilter::BYTE_STRING.with_tags(&[3]).matches(&bignum));
        assert!(TypeFilter::BYTE_STRING.with_any_tag().matches(&bignum));
        // Allowed tag, wrong content.
        assert!(!TypeFilter::TEXT_STRING.with_any_tag().matches(&bignum));
    }

    #[test]
    fn any_and_none() {
        let values = [
            int(1),
            int(-1),
            CborValue::Float(0.5),
            CborValue::Bytes(vec![]),
            CborValue::Text(String::new()),
            CborValue::Array(vec![]),
            CborValue::Map(vec![]),
            CborValue::Bool(false),
            CborValue::Null,
            CborValue::Tag(99, Box::new(CborValue::Null)),
        ];
        for v in &values {
            assert!(TypeFilter::ANY.matches(v), "{:?}", v);
            assert!(!TypeFilter::NONE.matches(v), "{:?}", v);
        }
    }

    #[test]
    fn element_filters() {
        let integer = TypeFilter::UNSIGNED_INTEGER.with_negative_integer();
        let f = TypeFilter::NONE.with_array_elements(&[integer.clone(), integer.with_tags(&[2, 3])]);
        assert_eq!(f.length_range(MajorType::Array), Some(LengthRange::exact(2)));
        assert!(f.element_matches(0, &int(-2)));
        assert!(!f.element_matches(0, &CborValue::Float(1.0)));
        let big = CborValue::Tag(3, Box::new(CborValue::Bytes(vec![1])));
        assert!(!f.element_matches(0, &big));
        assert!(f.element_matches(1, &CborValue::Tag(2, Box::new(int(1)))));
        // Unconstrained past the element list.
        assert!(f.element_matches(7, &CborValue::Null));
    }

    #[test]
    fn element_union_keeps_common_prefix() {
        let a = TypeFilter::NONE.with_array_elements(&[TypeFilter::UNSIGNED_INTEGER]);
        let b = TypeFilter::NONE.with_array_elements(&[TypeFilter::TEXT_STRING, TypeFilter::NULL]);
        let u = a.union(&b);
        assert!(u.element_matches(0, &int(1)));
        assert!(u.element_matches(0, &CborValue::Text("x".into())));
        assert!(u.element(1).is_none());
    }

    #[test]
    fn union_is_commutative() {
        let a = TypeFilter::TEXT_STRING.with_tags(&[5, 1]);
        let b = TypeFilter::NONE.with_array(1, 3).with_tags(&[1, 9]);
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&a), a);
    }

    #[test]
    fn display() {
        assert_eq!(
            numeric().to_string(),
            "unsigned integer | negative integer | floating point"
        );
        assert_eq!(
            TypeFilter::NONE.with_byte_string_length(16, 16).to_string(),
            "byte string(16)"
        );
        assert_eq!(
            TypeFilter::BYTE_STRING.with_tags(&[3, 2]).to_string(),
            "byte string, tags [2, 3]"
        );
        assert_eq!(TypeFilter::NONE.to_string(), "nothing");
    }
}
