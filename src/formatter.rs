use crate::env::{
    env_or, SPLUNK_LOG_APP_ENV, SPLUNK_LOG_BASE_URL_ENV, SPLUNK_LOG_ENCODING_ENV,
    SPLUNK_LOG_TIMEZONE_ENV,
};
use crate::placeholder::substitute;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::strip::strip_tags;
use crate::template::{tokens, ValueEncoding, CRLF, DEFAULT_APP, DEFAULT_TEMPLATE};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Rendered for timestamps whose year does not fit in four digits.
pub const EPOCH_DATE: &str = "1970-01-01T00:00:00";

/// Clock used to render the `date` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Utc,
    /// The host's local time zone.
    Local,
}

/// Errors raised while reading formatter configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid time zone {0:?}, expected \"utc\" or \"local\"")]
    InvalidTimeZone(String),

    #[error("{0}")]
    InvalidEncoding(String),
}

/// Construction-time settings for [`SplunkFormatter`].
///
/// Set once at startup and immutable afterwards.
///
/// **Fields**
/// - `app`: value of the `app` slot.
/// - `base_url`: site base URL, available to custom templates as
///   `!base_url`.
/// - `time_zone`: clock used for the `date` slot.
/// - `encoding`: how values are written into quoted slots.
/// - `line_terminator`: appended to each line.
/// - `template`: line layout with `!token` slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub app: String,
    pub base_url: Option<String>,
    pub time_zone: TimeZoneMode,
    pub encoding: ValueEncoding,
    pub line_terminator: String,
    pub template: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            app: DEFAULT_APP.to_string(),
            base_url: None,
            time_zone: TimeZoneMode::Utc,
            encoding: ValueEncoding::Json,
            line_terminator: CRLF.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl FormatterConfig {
    /// Build a config from `SPLUNK_LOG_*` environment variables, using
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let time_zone = match env_or(SPLUNK_LOG_TIMEZONE_ENV, "utc").to_ascii_lowercase().as_str() {
            "utc" => TimeZoneMode::Utc,
            "local" => TimeZoneMode::Local,
            other => return Err(ConfigError::InvalidTimeZone(other.to_string())),
        };
        let encoding = env_or(SPLUNK_LOG_ENCODING_ENV, "json")
            .parse()
            .map_err(ConfigError::InvalidEncoding)?;
        let base_url = std::env::var(SPLUNK_LOG_BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty());

        Ok(Self {
            app: env_or(SPLUNK_LOG_APP_ENV, &defaults.app),
            base_url,
            time_zone,
            encoding,
            ..defaults
        })
    }
}

/// Turns a [`LogRecord`] into one Splunk line.
///
/// Pure: the same record and config always produce the same text.
#[derive(Clone, Debug, Default)]
pub struct SplunkFormatter {
    config: FormatterConfig,
}

impl SplunkFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Format `record` into the configured template, without the line
    /// terminator.
    ///
    /// Message and link are resolved (placeholders for text, rendering
    /// for markup), stripped of tags, then every value is encoded for its
    /// quoted slot.
    pub fn format(&self, record: &LogRecord) -> String {
        let encoding = self.config.encoding;
        let enc = |value: &str| encoding.encode(value);

        let message = strip_tags(&record.message.resolve(&record.placeholders));
        let link = record
            .link
            .as_ref()
            .map(|link| strip_tags(&link.resolve(&BTreeMap::new())))
            .unwrap_or_default();

        let values: [(&str, String); 12] = [
            (tokens::APP, enc(&self.config.app)),
            (tokens::BASE_URL, enc(self.config.base_url.as_deref().unwrap_or(""))),
            (tokens::TIMESTAMP, record.timestamp.to_string()),
            (tokens::SEVERITY, Severity::name_or_unknown(record.severity).to_string()),
            (tokens::TYPE, enc(&record.channel)),
            (tokens::DATE, format_date(record.timestamp, self.config.time_zone)),
            (tokens::MESSAGE, enc(&message)),
            (tokens::UID, enc(&record.uid)),
            (tokens::REQUEST_URI, enc(&record.request_uri)),
            (tokens::REFERER, enc(&record.referer)),
            (tokens::IP, enc(&record.ip)),
            (tokens::LINK, enc(&link)),
        ];

        substitute(
            &self.config.template,
            values.iter().map(|(token, value)| (*token, value.as_str())),
        )
    }

    /// [`format`](Self::format) followed by the line terminator.
    pub fn format_line(&self, record: &LogRecord) -> String {
        let mut line = self.format(record);
        line.push_str(&self.config.line_terminator);
        line
    }
}

/// Render epoch seconds as `YYYY-MM-DDTHH:MM:SS`.
///
/// Always 19 characters; out-of-range values yield [`EPOCH_DATE`].
pub fn format_date(timestamp: i64, time_zone: TimeZoneMode) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return EPOCH_DATE.to_string();
    };
    let text = match time_zone {
        TimeZoneMode::Utc => utc.format(DATE_FORMAT).to_string(),
        TimeZoneMode::Local => utc.with_timezone(&Local).format(DATE_FORMAT).to_string(),
    };
    if text.len() == EPOCH_DATE.len() {
        text
    } else {
        EPOCH_DATE.to_string()
    }
}
