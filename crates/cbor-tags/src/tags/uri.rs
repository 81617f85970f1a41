use std::sync::OnceLock;

use ciborium::value::Value as CborValue;
use regex::Regex;

use super::TAG_URI;
use crate::error::ValidationError;
use crate::filter::TypeFilter;
use crate::handler::TagHandler;
use crate::value::Shape;

static FILTER: TypeFilter = TypeFilter::TEXT_STRING;

// RFC 3986 absolute URI: scheme, then unreserved / reserved / pct-encoded
// characters only. No whitespace, controls or bare `%`.
fn uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^[a-z][a-z0-9+\-.]*:(?:[a-z0-9\-._~!$&'()*+,;=:@/?\[\]]|%[0-9a-f]{2})*(?:#(?:[a-z0-9\-._~!$&'()*+,;=:@/?]|%[0-9a-f]{2})*)?$",
        )
        .expect("uri pattern compiles")
    })
}

pub fn is_absolute_uri(s: &str) -> bool {
    uri_regex().is_match(s)
}

/// Tag 32: URI.
#[derive(Debug, Default, Clone, Copy)]
pub struct UriHandler;

impl TagHandler for UriHandler {
    fn tag(&self) -> u64 {
        TAG_URI
    }

    fn type_filter(&self) -> &TypeFilter {
        &FILTER
    }

    fn validate(&self, value: CborValue) -> Result<CborValue, ValidationError> {
        let CborValue::Text(s) = &value else {
            return Err(ValidationError::invalid(
                TAG_URI,
                "URI must be a text string",
                Shape::of(&value),
            ));
        };
        if !is_absolute_uri(s) {
            return Err(ValidationError::invalid(
                TAG_URI,
                "not a valid absolute URI",
                Shape::of(&value),
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_uris() {
        for s in [
            "http://www.example.com",
            "https://user@host:8080/a/b?q=1&r=%20#frag",
            "urn:isbn:0451450523",
            "mailto:someone@example.org",
            "http://[::1]/",
        ] {
            assert!(is_absolute_uri(s), "{}", s);
        }
    }

    #[test]
    fn rejects_relative_or_malformed() {
        for s in ["", "/relative/path", "no scheme", "1http://x", "http://a b", "http://x/%zz", "a:b#c#d"] {
            assert!(!is_absolute_uri(s), "{}", s);
            let err = UriHandler.validate(CborValue::Text(s.into())).unwrap_err();
            assert_eq!(err.reason(), "not a valid absolute URI");
        }
    }
}
