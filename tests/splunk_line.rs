//! End-to-end checks of the emitted Splunk line.

use std::sync::Arc;

use serde_json::Value;
use tracing_splunk_sink::sink::WriterSink;
use tracing_splunk_sink::{
    FormatterConfig, Link, LogContext, Markup, Severity, SplunkFormatter, SplunkLogger,
};

fn cron_context() -> LogContext {
    LogContext::new()
        .with("timestamp", 1_700_000_000)
        .with("channel", "cron")
        .with("uid", "42")
        .with("request_uri", "/cron")
        .with("referer", "-")
        .with("ip", "127.0.0.1")
        .with("link", "")
}

fn logger() -> (SplunkLogger, Arc<WriterSink<Vec<u8>>>) {
    let sink = Arc::new(WriterSink::new(Vec::new()));
    let logger = SplunkLogger::new(SplunkFormatter::new(FormatterConfig::default()), sink.clone());
    (logger, sink)
}

fn output(sink: &WriterSink<Vec<u8>>) -> String {
    sink.with_writer(|buf| String::from_utf8(buf.clone()).unwrap())
        .unwrap()
}

#[test]
fn cron_failure_matches_reference_line() {
    let (logger, sink) = logger();

    logger.error("User %uid failed", &cron_context().with("%uid", "42"));

    assert_eq!(
        output(&sink),
        concat!(
            r#"{"app": "drupal", "severity": "Error", "type": "cron", "date": "2023-11-14T22:13:20", "#,
            r#""message": "User 42 failed",  "uid": "42",  "request-uri": "/cron", "refer": "-", "#,
            r#""ip":  "127.0.0.1",  "link": ""}"#,
            "\r\n"
        )
    );
}

#[test]
fn script_tags_are_removed_from_message() {
    let (logger, sink) = logger();

    logger.warning("<script>alert(1)</script>", &cron_context());

    let line = output(&sink);
    let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(parsed["message"], "alert(1)");
}

#[test]
fn missing_referer_renders_empty() {
    let (logger, sink) = logger();
    let context = LogContext::new()
        .with("timestamp", 1_700_000_000)
        .with("channel", "user");

    logger.notice("Session opened", &context);

    let line = output(&sink);
    let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(parsed["refer"], "");
    assert_eq!(parsed["uid"], "");
    assert_eq!(parsed["link"], "");
}

#[test]
fn unmatched_placeholders_pass_through() {
    let (logger, sink) = logger();

    logger.info("Deleted %type @title", &cron_context().with("%type", "page"));

    let line = output(&sink);
    assert!(line.contains(r#""message": "Deleted page @title""#));
}

#[test]
fn markup_message_and_link_are_rendered_then_stripped() {
    let (logger, sink) = logger();
    let context = cron_context()
        .with("%name", "ignored")
        .with_link(Link::new("edit", "/node/7/edit"));
    let message = Markup::new("Updated %name").arg("%name", "About us");

    logger.log(Some(Severity::Notice), message, &context);

    let line = output(&sink);
    let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(parsed["message"], "Updated About us");
    assert_eq!(parsed["link"], "edit");
}

#[test]
fn every_line_is_terminated_once() {
    let (logger, sink) = logger();
    let context = cron_context().with("uid", "multi\r\nline");

    for level in Severity::ALL {
        logger.log(Some(level), "line\nbreak", &context);
    }

    let text = output(&sink);
    assert!(text.ends_with("\r\n"));
    let lines: Vec<&str> = text.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), Severity::ALL.len());
    for (line, level) in lines.iter().zip(Severity::ALL) {
        assert!(!line.contains('\n') && !line.contains('\r'));
        let parsed: Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["severity"], level.name());
        assert_eq!(parsed["date"].as_str().map(str::len), Some(19));
    }
}
