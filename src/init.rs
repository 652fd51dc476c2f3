use crate::backend::{make_sink_from_config, parse_target, TargetError};
use crate::env::{env_or, SPLUNK_LOG_TARGET_ENV};
use crate::formatter::{ConfigError, FormatterConfig, SplunkFormatter};
use crate::layer::SplunkLayer;
use crate::logger::SplunkLogger;
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the Splunk layer.
///
/// **Fields**
/// - `formatter`: settings of the line formatter.
/// - `min_level`: least important `tracing` level that is forwarded.
/// - `enable_fmt`: if `true`, a human-readable
///   `tracing_subscriber::fmt::Layer` writing to stderr is stacked on top,
///   keeping stdout reserved for Splunk lines.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub formatter: FormatterConfig,
    pub min_level: Level,
    pub enable_fmt: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            formatter: FormatterConfig::default(),
            min_level: Level::TRACE,
            enable_fmt: false,
        }
    }
}

/// Errors raised while installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize the global `tracing` subscriber using the provided sink and
/// [`LayerConfig`].
///
/// **Parameters**
/// - `sink`: destination for formatted lines.
/// - `config`: [`LayerConfig`] controlling formatting and filtering.
///
/// **Returns**
/// - The [`SplunkLogger`] behind the layer, for direct calls and stats.
/// - `Err(InitError::AlreadyInstalled)` if a global subscriber exists.
pub fn init_tracing_with_config(
    sink: Arc<dyn LogSink>,
    config: LayerConfig,
) -> Result<SplunkLogger, InitError> {
    let logger = SplunkLogger::new(SplunkFormatter::new(config.formatter), sink);
    let layer = SplunkLayer::new(logger.clone(), config.min_level);

    // Two subscriber shapes because the layered types differ.
    if config.enable_fmt {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(logger)
}

/// Initialize tracing with default formatting and the given sink.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing(sink: Arc<dyn LogSink>) -> Result<SplunkLogger, InitError> {
    init_tracing_with_config(sink, LayerConfig::default())
}

/// Initialize tracing entirely from `SPLUNK_LOG_*` environment variables.
///
/// This is the recommended entrypoint for services that run under a
/// Splunk forwarder: with nothing set it writes the default line format
/// to stdout.
pub fn init_tracing_from_env() -> Result<SplunkLogger, InitError> {
    let target = parse_target(&env_or(SPLUNK_LOG_TARGET_ENV, "stdout"))?;
    let sink = make_sink_from_config(&target);
    let config = LayerConfig {
        formatter: FormatterConfig::from_env()?,
        ..LayerConfig::default()
    };
    init_tracing_with_config(sink, config)
}
