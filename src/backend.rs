use std::path::PathBuf;
use std::sync::Arc;

use crate::noop_sink::NoopSink;
use crate::sink::{FileSink, LogSink, StderrSink, StdoutSink};

/// Supported output destinations that can be selected via a target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Stdout,
    Stderr,
    File(PathBuf),
    Noop,
}

/// Parse a target string into a [`SinkTarget`].
///
/// Examples:
/// - "stdout" (also "-")
/// - "stderr"
/// - "noop"
/// - "file:///var/log/app/splunk.log"
pub fn parse_target(target: &str) -> Result<SinkTarget, TargetError> {
    let trimmed = target.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower == "stdout" || lower == "-" {
        Ok(SinkTarget::Stdout)
    } else if lower == "stderr" {
        Ok(SinkTarget::Stderr)
    } else if lower == "noop" {
        Ok(SinkTarget::Noop)
    } else if lower.starts_with("file://") {
        let path = &trimmed["file://".len()..];
        if path.is_empty() {
            Err(TargetError::MissingPath)
        } else {
            Ok(SinkTarget::File(PathBuf::from(path)))
        }
    } else {
        Err(TargetError::UnknownTarget(trimmed.to_string()))
    }
}

/// Error type returned when parsing a sink target.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("unknown or unsupported sink target {0:?}")]
    UnknownTarget(String),

    #[error("file target is missing a path")]
    MissingPath,
}

/// Create a concrete `LogSink` implementation from a [`SinkTarget`].
///
/// This is the main entry point for applications that want to select
/// a destination using a single string instead of constructing sinks
/// manually.
pub fn make_sink_from_config(target: &SinkTarget) -> Arc<dyn LogSink> {
    match target {
        SinkTarget::Stdout => Arc::new(StdoutSink),
        SinkTarget::Stderr => Arc::new(StderrSink),
        SinkTarget::File(path) => Arc::new(FileSink::new(path.clone())),
        SinkTarget::Noop => Arc::new(NoopSink),
    }
}
