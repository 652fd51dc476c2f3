use crate::message::Message;
use crate::placeholder::parse_message_placeholders;
use crate::severity::Severity;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

/// Context keys the logger reads into dedicated [`LogRecord`] fields.
pub mod keys {
    pub const TIMESTAMP: &str = "timestamp";
    pub const CHANNEL: &str = "channel";
    pub const UID: &str = "uid";
    pub const REQUEST_URI: &str = "request_uri";
    pub const REFERER: &str = "referer";
    pub const IP: &str = "ip";
    pub const LINK: &str = "link";
}

/// Structured context accompanying a log call.
///
/// Any key may be present or absent; absent keys read as empty strings.
/// The `link` entry may additionally be a renderable [`Message`].
#[derive(Clone, Debug, Default)]
pub struct LogContext {
    fields: BTreeMap<String, Value>,
    link: Option<Message>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_link(mut self, link: impl Into<Message>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn set_link(&mut self, link: impl Into<Message>) {
        self.link = Some(link.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String form of `key`, or an empty string if it is absent.
    pub fn get_str(&self, key: &str) -> String {
        self.get(key).map(Self::stringify).unwrap_or_default()
    }

    /// The link as a message: an explicit renderable link wins over a
    /// plain `link` field.
    pub fn link(&self) -> Option<Message> {
        self.link.clone().or_else(|| match self.get(keys::LINK) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Message::Text(Self::stringify(value))),
        })
    }

    /// Epoch seconds from the `timestamp` key, accepting integers,
    /// integral floats and numeric strings.
    pub fn timestamp(&self) -> Option<i64> {
        match self.get(keys::TIMESTAMP)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text form of a context value: strings verbatim, `null` empty,
    /// anything else as JSON text.
    pub fn stringify(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// A single log event, resolved from the logger's inputs and discarded
/// once formatted.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// `None` for levels outside the RFC 5424 set.
    pub severity: Option<Severity>,
    pub channel: String,
    /// Epoch seconds.
    pub timestamp: i64,
    pub message: Message,
    pub placeholders: BTreeMap<String, String>,
    pub uid: String,
    pub request_uri: String,
    pub referer: String,
    pub ip: String,
    pub link: Option<Message>,
}

impl LogRecord {
    /// Build a record from a logger call.
    ///
    /// Placeholders are parsed from `context` for text messages (which
    /// may rewrite PSR-3 `{name}` tokens). Missing context keys become
    /// empty strings; a missing `timestamp` uses the current clock.
    pub fn from_context(
        severity: Option<Severity>,
        message: impl Into<Message>,
        context: &LogContext,
    ) -> Self {
        let mut message = message.into();
        let placeholders = match &mut message {
            Message::Text(text) => parse_message_placeholders(text, context),
            Message::Rendered(_) => BTreeMap::new(),
        };

        LogRecord {
            severity,
            channel: context.get_str(keys::CHANNEL),
            timestamp: context.timestamp().unwrap_or_else(|| Utc::now().timestamp()),
            message,
            placeholders,
            uid: context.get_str(keys::UID),
            request_uri: context.get_str(keys::REQUEST_URI),
            referer: context.get_str(keys::REFERER),
            ip: context.get_str(keys::IP),
            link: context.link(),
        }
    }
}
