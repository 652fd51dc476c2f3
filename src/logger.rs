use crate::formatter::SplunkFormatter;
use crate::message::Message;
use crate::record::{LogContext, LogRecord};
use crate::severity::Severity;
use crate::sink::LogSink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Event counters shared between a logger and whoever wants to watch it.
#[derive(Debug, Default)]
pub struct LoggerStats {
    /// Every call to [`SplunkLogger::log`].
    pub total_events: AtomicU64,
    /// Lines the sink accepted.
    pub written_events: AtomicU64,
    /// Lines the sink rejected.
    pub failed_events: AtomicU64,
}

impl LoggerStats {
    pub fn total(&self) -> u64 {
        self.total_events.load(Ordering::Relaxed)
    }

    pub fn written(&self) -> u64 {
        self.written_events.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed_events.load(Ordering::Relaxed)
    }
}

/// Formats log calls into Splunk lines and writes them to a sink.
///
/// Logging is best effort: nothing in here returns an error to the caller.
/// Sink failures are counted and reported on stderr.
#[derive(Clone)]
pub struct SplunkLogger {
    formatter: SplunkFormatter,
    sink: Arc<dyn LogSink>,
    stats: Arc<LoggerStats>,
}

impl SplunkLogger {
    /// **Parameters**
    /// - `formatter`: line formatter, configured once at startup.
    /// - `sink`: destination for formatted lines.
    pub fn new(formatter: SplunkFormatter, sink: Arc<dyn LogSink>) -> Self {
        Self {
            formatter,
            sink,
            stats: Arc::new(LoggerStats::default()),
        }
    }

    pub fn formatter(&self) -> &SplunkFormatter {
        &self.formatter
    }

    pub fn stats(&self) -> Arc<LoggerStats> {
        Arc::clone(&self.stats)
    }

    /// Log one event.
    ///
    /// **Parameters**
    /// - `severity`: resolved level; `None` renders as `Unknown`.
    /// - `message`: template text or rendered markup.
    /// - `context`: channel, request data, timestamp, link and
    ///   placeholder values.
    pub fn log(&self, severity: Option<Severity>, message: impl Into<Message>, context: &LogContext) {
        self.stats.total_events.fetch_add(1, Ordering::Relaxed);

        let record = LogRecord::from_context(severity, message, context);
        let line = self.formatter.format_line(&record);

        match self.sink.write_line(&line) {
            Ok(()) => {
                self.stats.written_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("splunk log sink write failed, dropping line: {}", e);
            }
        }
    }

    /// Log with a raw numeric syslog code; codes outside `0..=7` are
    /// logged as `Unknown`.
    pub fn log_code(&self, code: i64, message: impl Into<Message>, context: &LogContext) {
        self.log(Severity::from_code(code), message, context);
    }

    pub fn emergency(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Emergency), message, context);
    }

    pub fn alert(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Alert), message, context);
    }

    pub fn critical(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Critical), message, context);
    }

    pub fn error(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Error), message, context);
    }

    pub fn warning(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Warning), message, context);
    }

    pub fn notice(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Notice), message, context);
    }

    pub fn info(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Info), message, context);
    }

    pub fn debug(&self, message: impl Into<Message>, context: &LogContext) {
        self.log(Some(Severity::Debug), message, context);
    }
}
