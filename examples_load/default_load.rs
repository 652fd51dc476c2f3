use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use tracing_splunk_sink::init::init_tracing;
use tracing_splunk_sink::noop_sink::NoopSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(NoopSink);
    let logger = init_tracing(sink)?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(channel = "load", iteration = i, "default load test error {{iteration}}");
    }

    let elapsed = start.elapsed();
    println!("default config: formatted {} events in {:?} (~{:.0} ev/s), written {}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        logger.stats().written()
    );
    Ok(())
}
