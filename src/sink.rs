use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Error returned by a [`LogSink`] when a line could not be delivered.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("write to {target} failed: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("sink {0} is poisoned by a panicked writer")]
    Poisoned(String),
}

impl SinkError {
    fn io(target: impl Into<String>, source: io::Error) -> Self {
        SinkError::Io {
            target: target.into(),
            source,
        }
    }
}

/// Synchronous destination for formatted log lines.
///
/// Implementations must write each line whole: concurrent callers may
/// block each other but their lines never interleave.
pub trait LogSink: Send + Sync {
    /// Write one complete line, terminator included, and flush it.
    ///
    /// **Parameters**
    /// - `line`: a single formatted record ending with its terminator.
    ///
    /// **Returns**
    /// - `Ok(())` once the bytes were handed to the destination.
    /// - `Err(..)` if the write or flush failed (closed pipe, full disk,
    ///   etc). The logger counts and reports the failure; it never
    ///   reaches application code.
    fn write_line(&self, line: &str) -> Result<(), SinkError>;
}

/// Writes to the process standard output.
///
/// The stdout handle is locked for the duration of each line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        out.write_all(line.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| SinkError::io("stdout", e))
    }
}

/// Writes to the process standard error.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut out = io::stderr().lock();
        out.write_all(line.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| SinkError::io("stderr", e))
    }
}

/// Appends to a file, opening and closing it for every line.
///
/// Nothing is held open between events, so rotation by an external tool
/// is picked up on the next line.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let target = self.path.display().to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::io(target.clone(), e))?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| SinkError::io(target, e))
    }
}

/// Wraps any [`Write`] implementation behind a mutex.
///
/// Handy for tests (`Vec<u8>`) and for pre-opened handles such as pipes.
#[derive(Debug, Default)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the inner writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|_| SinkError::Poisoned("writer".to_string()))
    }

    /// Run `f` with shared access to the writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&W) -> R) -> Result<R, SinkError> {
        let guard = self
            .writer
            .lock()
            .map_err(|_| SinkError::Poisoned("writer".to_string()))?;
        Ok(f(&guard))
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Poisoned("writer".to_string()))?;
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| SinkError::io("writer", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn writer_sink_keeps_lines_whole_across_threads() {
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..50 {
                        let line = format!("{{\"t\": {t}, \"i\": {i}}}\r\n");
                        sink.write_line(&line).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let bytes = Arc::try_unwrap(sink).unwrap().into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }

    #[test]
    fn file_sink_appends_per_line() {
        let path = std::env::temp_dir().join(format!(
            "splunk-sink-test-{}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let sink = FileSink::new(&path);

        sink.write_line("one\r\n").unwrap();
        sink.write_line("two\r\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "one\r\ntwo\r\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_sink_reports_open_failures() {
        let sink = FileSink::new(std::env::temp_dir());
        assert!(matches!(sink.write_line("x\r\n"), Err(SinkError::Io { .. })));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_errors_surface_as_sink_errors() {
        let sink = WriterSink::new(BrokenPipe);
        let err = sink.write_line("x\r\n").unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
