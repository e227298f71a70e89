//! Serialization formats a response body can be rendered in

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format token, chosen once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    Text,
    Json,
    Csv,
    Xml,
    Turtle,
}

impl SerializationFormat {
    pub const ALL: [SerializationFormat; 5] = [
        SerializationFormat::Text,
        SerializationFormat::Json,
        SerializationFormat::Csv,
        SerializationFormat::Xml,
        SerializationFormat::Turtle,
    ];

    /// Short token used on the command line and in logs
    pub fn token(self) -> &'static str {
        match self {
            SerializationFormat::Text => "text",
            SerializationFormat::Json => "json",
            SerializationFormat::Csv => "csv",
            SerializationFormat::Xml => "xml",
            SerializationFormat::Turtle => "turtle",
        }
    }

    /// Media type sent as `Content-Type` for a body in this format
    pub fn media_type(self) -> &'static str {
        match self {
            SerializationFormat::Text => "text/plain",
            SerializationFormat::Json => "application/json",
            SerializationFormat::Csv => "text/csv",
            SerializationFormat::Xml => "text/xml",
            SerializationFormat::Turtle => "text/turtle",
        }
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Unknown format token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown serialization format '{0}' (expected one of text, json, csv, xml, turtle)")]
pub struct UnknownFormat(pub String);

impl FromStr for SerializationFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SerializationFormat::ALL
            .into_iter()
            .find(|format| format.token() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trips_through_from_str() {
        for format in SerializationFormat::ALL {
            assert_eq!(format.token().parse::<SerializationFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_unknown_token() {
        let err = "txt".parse::<SerializationFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("txt".to_string()));
    }
}
