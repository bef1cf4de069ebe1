use chrono::Local;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Maximum number of log lines kept in memory.
const MAX_LOG_LINES: usize = 500;

/// One captured log line, stamped when it was written.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: String,
    pub text: String,
}

impl LogLine {
    fn new(text: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            text,
        }
    }

    /// Format for the log popup.
    pub fn format_for_display(&self) -> String {
        format!("[{}] {}", self.timestamp, self.text)
    }
}

/// Thread-safe bounded buffer of recent log lines. The TUI reads from it to
/// render the log popup; the tracing subscriber writes into it.
#[derive(Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
}

impl LogBuffer {
    pub fn push(&self, text: String) {
        let mut lines = self.lines.lock().unwrap();
        if lines.len() >= MAX_LOG_LINES {
            lines.pop_front();
        }
        lines.push_back(LogLine::new(text));
    }

    /// The most recent `count` lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap();
        lines.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `io::Write` adapter that splits subscriber output into lines and pushes
/// them into the buffer.
pub struct LogBufferWriter {
    buffer: LogBuffer,
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                self.buffer.push(line.to_string());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buffer: self.clone(),
        }
    }
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// The process-wide log buffer.
pub fn log_buffer() -> &'static LogBuffer {
    LOG_BUFFER.get_or_init(LogBuffer::default)
}

/// Install a tracing subscriber that writes into the in-memory buffer.
/// `RUST_LOG` filters as usual; the default level is info. Safe to call
/// more than once (later calls keep the first subscriber).
pub fn init_tracing() -> LogBuffer {
    let buffer = log_buffer().clone();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .try_init();

    buffer.push("logging initialized".to_string());
    buffer
}
