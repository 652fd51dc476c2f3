use crate::sink::{LogSink, SinkError};

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of formatting without any I/O, and
/// for tests that don't care about output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_line(&self, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
