pub mod severity;
pub mod message;
pub mod placeholder;
pub mod strip;
pub mod record;
pub mod template;
pub mod formatter;
pub mod sink;
pub mod noop_sink;
pub mod logger;
pub mod layer;
pub mod backend;
pub mod env;
pub mod init;

pub use formatter::{FormatterConfig, SplunkFormatter};
pub use logger::SplunkLogger;
pub use message::{Link, Markup, Message, Render};
pub use record::{LogContext, LogRecord};
pub use severity::Severity;
