//! The fixed line template and how values are encoded into its slots.

use serde::{Deserialize, Serialize};

/// Default line layout. The irregular double spaces are kept so existing
/// Splunk field extractions keep matching.
pub const DEFAULT_TEMPLATE: &str = r#"{"app": "!app", "severity": "!severity", "type": "!type", "date": "!date", "message": "!message",  "uid": "!uid",  "request-uri": "!request_uri", "refer": "!referer", "ip":  "!ip",  "link": "!link"}"#;

/// Default value of the `app` slot.
pub const DEFAULT_APP: &str = "drupal";

/// Default line terminator.
pub const CRLF: &str = "\r\n";

/// Tokens recognised in a line template.
pub mod tokens {
    pub const APP: &str = "!app";
    pub const BASE_URL: &str = "!base_url";
    pub const TIMESTAMP: &str = "!timestamp";
    pub const SEVERITY: &str = "!severity";
    pub const TYPE: &str = "!type";
    pub const DATE: &str = "!date";
    pub const MESSAGE: &str = "!message";
    pub const UID: &str = "!uid";
    pub const REQUEST_URI: &str = "!request_uri";
    pub const REFERER: &str = "!referer";
    pub const IP: &str = "!ip";
    pub const LINK: &str = "!link";
}

/// How a value is written into its quoted template slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueEncoding {
    /// JSON string escaping; the line is always valid JSON.
    #[default]
    Json,
    /// Inserted as-is, except CR/LF become spaces to keep the line whole.
    Verbatim,
}

impl ValueEncoding {
    pub fn encode(self, value: &str) -> String {
        match self {
            ValueEncoding::Json => json_escape(value),
            ValueEncoding::Verbatim => value.replace(['\r', '\n'], " "),
        }
    }
}

impl std::str::FromStr for ValueEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ValueEncoding::Json),
            "verbatim" | "raw" => Ok(ValueEncoding::Verbatim),
            other => Err(format!("unknown value encoding {other:?}")),
        }
    }
}

/// Escape `value` as the body of a JSON string (no surrounding quotes).
fn json_escape(value: &str) -> String {
    match serde_json::to_string(value) {
        Ok(quoted) => quoted
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(&quoted)
            .to_string(),
        Err(_) => ValueEncoding::Verbatim.encode(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_encoding_escapes_structure_breakers() {
        let out = ValueEncoding::Json.encode("say \"hi\"\r\n\\ok\t");
        assert_eq!(out, r#"say \"hi\"\r\n\\ok\t"#);
    }

    #[test]
    fn verbatim_only_flattens_line_breaks() {
        let out = ValueEncoding::Verbatim.encode("a \"b\"\r\nc");
        assert_eq!(out, "a \"b\"  c");
    }

    #[test]
    fn parses_encoding_names() {
        assert_eq!("JSON".parse::<ValueEncoding>(), Ok(ValueEncoding::Json));
        assert_eq!("raw".parse::<ValueEncoding>(), Ok(ValueEncoding::Verbatim));
        assert!("xml".parse::<ValueEncoding>().is_err());
    }
}
