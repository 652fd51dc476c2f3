use crate::logger::SplunkLogger;
use crate::record::{keys, LogContext};
use crate::severity::Severity;
use serde_json::Value;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Event field that overrides the severity derived from the `tracing`
/// level. Accepts a syslog code or a level name.
pub const SEVERITY_FIELD: &str = "severity";

/// `tracing_subscriber` layer that turns events into Splunk lines.
///
/// The event's `message` becomes the log message, the `channel` field (or
/// the event target) the channel, and every other field lands in the log
/// context, so `{name}` placeholders resolve against event fields.
/// Writing happens synchronously on the emitting thread.
pub struct SplunkLayer {
    logger: SplunkLogger,
    min_level: Level,
}

impl SplunkLayer {
    /// Create a layer that forwards events at or above `min_level`.
    pub fn new(logger: SplunkLogger, min_level: Level) -> Self {
        Self { logger, min_level }
    }

    pub fn logger(&self) -> &SplunkLogger {
        &self.logger
    }
}

impl<S> Layer<S> for SplunkLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.min_level {
            return;
        }

        let mut context = LogContext::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            context: &mut context,
            message: &mut message,
        };
        event.record(&mut visitor);

        let severity = match context.get(SEVERITY_FIELD) {
            Some(Value::Number(n)) => n.as_i64().and_then(Severity::from_code),
            Some(Value::String(s)) => s.parse().ok(),
            _ => Some(Severity::from(*meta.level())),
        };
        if context.get(keys::CHANNEL).is_none() {
            context.insert(keys::CHANNEL, meta.target());
        }

        self.logger
            .log(severity, message.unwrap_or_default(), &context);
    }
}

/// Collects event fields into a [`LogContext`], pulling `message` out.
pub struct FieldVisitor<'a> {
    pub context: &'a mut LogContext,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.context.insert(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.context.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.context.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.context.insert(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.context.insert(field.name(), format!("{:?}", value));
        }
    }
}
