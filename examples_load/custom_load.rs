use std::sync::Arc;
use std::time::Instant;
use tracing::{error, Level};

use tracing_splunk_sink::formatter::FormatterConfig;
use tracing_splunk_sink::init::{init_tracing_with_config, LayerConfig};
use tracing_splunk_sink::noop_sink::NoopSink;
use tracing_splunk_sink::template::ValueEncoding;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(NoopSink);

    let layer_config = LayerConfig {
        formatter: FormatterConfig {
            app: "load-test".to_string(),
            encoding: ValueEncoding::Verbatim,
            ..FormatterConfig::default()
        },
        min_level: Level::ERROR,
        enable_fmt: false,
    };

    let logger = init_tracing_with_config(sink, layer_config)?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "custom load test <b>error</b>");
    }

    let elapsed = start.elapsed();
    println!("custom config: formatted {} events in {:?} (~{:.0} ev/s), written {}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        logger.stats().written()
    );
    Ok(())
}
