//! Accept header negotiation

use crate::error::ApiError;
use hello_sparql_core::SerializationFormat;

/// Exact, case-sensitive Accept values the service answers
const ACCEPT_TABLE: [(&str, SerializationFormat); 6] = [
    ("*/*", SerializationFormat::Text),
    ("application/json", SerializationFormat::Json),
    ("text/csv", SerializationFormat::Csv),
    ("text/xml", SerializationFormat::Xml),
    ("text/plain", SerializationFormat::Text),
    ("text/turtle", SerializationFormat::Turtle),
];

/// Format and media type chosen for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFormat {
    pub format: SerializationFormat,
    pub media_type: &'static str,
}

/// Map the raw Accept header to a response format; no q-values, no wildcards
/// beyond `*/*`
pub fn negotiate(accept: Option<&str>) -> Result<NegotiatedFormat, ApiError> {
    let Some(accept) = accept else {
        return Err(ApiError::UnsupportedAcceptHeader("none".to_string()));
    };
    ACCEPT_TABLE
        .iter()
        .find(|(value, _)| *value == accept)
        .map(|(_, format)| NegotiatedFormat {
            format: *format,
            media_type: format.media_type(),
        })
        .ok_or_else(|| ApiError::UnsupportedAcceptHeader(accept.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table() {
        let expected = [
            ("*/*", "text/plain"),
            ("application/json", "application/json"),
            ("text/csv", "text/csv"),
            ("text/xml", "text/xml"),
            ("text/plain", "text/plain"),
            ("text/turtle", "text/turtle"),
        ];
        for (accept, media_type) in expected {
            assert_eq!(negotiate(Some(accept)).unwrap().media_type, media_type);
        }
    }

    #[test]
    fn test_strict_matching() {
        for accept in ["text/*", "TEXT/CSV", "application/json; q=0.9", "text/csv, text/xml", ""] {
            assert!(negotiate(Some(accept)).is_err(), "{accept}");
        }
        assert_eq!(
            negotiate(None).unwrap_err(),
            ApiError::UnsupportedAcceptHeader("none".to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_values_outside_table_are_rejected(accept in "\\PC*") {
            prop_assume!(ACCEPT_TABLE.iter().all(|(value, _)| *value != accept));
            prop_assert!(matches!(negotiate(Some(&accept)), Err(ApiError::UnsupportedAcceptHeader(_))));
        }
    }
}
