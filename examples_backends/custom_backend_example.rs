use std::sync::Arc;

use tracing::{error, info};
use tracing_splunk_sink::{
    init::init_tracing,
    sink::{LogSink, SinkError},
};

/// Example of plugging in a completely custom destination by implementing
/// the `LogSink` trait directly. Imagine this hands lines to a local
/// syslog socket the crate does not ship a sink for.
struct PrefixedStdoutSink;

impl LogSink for PrefixedStdoutSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        // A real sink would write to its own client here.
        print!("[custom] {}", line);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink: Arc<dyn LogSink> = Arc::new(PrefixedStdoutSink);

    init_tracing(sink)?;

    info!(channel = "example", "custom backend example started");
    error!(channel = "example", uid = 1, ip = "10.0.0.1", "simulated error for user {{uid}}");
    Ok(())
}
