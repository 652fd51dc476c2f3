use tracing::{error, info};
use tracing_splunk_sink::{
    backend::{make_sink_from_config, parse_target},
    init::init_tracing,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example target: file:///tmp/splunk.log (or stdout, stderr, noop)
    let target = std::env::var("SPLUNK_LOG_TARGET")
        .unwrap_or_else(|_| "file:///tmp/splunk.log".to_string());

    let sink = make_sink_from_config(&parse_target(&target)?);
    init_tracing(sink)?;

    info!(channel = "example", "file backend example started");
    error!(channel = "example", request_uri = "/node/1", "simulated error written to {}", target);
    Ok(())
}
