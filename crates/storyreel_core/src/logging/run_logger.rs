//! Per-run logger with file and console output.
//!
//! Each pipeline run gets its own logger that:
//! - Writes to a dedicated log file
//! - Optionally echoes to stderr
//! - Supports compact mode (tool output only kept in a tail buffer)
//! - Maintains a tail buffer replayed when an external command fails

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, MessagePrefix};

/// Per-run logger with dual output (file + stderr echo).
pub struct RunLogger {
    /// Run name for identification.
    run_name: String,
    /// Path to log file.
    log_path: PathBuf,
    /// File writer (buffered).
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    /// Logging configuration.
    config: LogConfig,
    /// Tail buffer of recent tool-output lines (for error diagnosis).
    tail_buffer: Arc<Mutex<VecDeque<String>>>,
}

impl RunLogger {
    /// Create a new run logger.
    ///
    /// # Arguments
    /// * `run_name` - Name of the run (used in log filename)
    /// * `log_dir` - Directory to write log file to
    /// * `config` - Logging configuration
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));

        let file = File::create(&log_path)?;
        let file_writer = BufWriter::new(file);

        Ok(Self {
            run_name,
            log_path,
            file_writer: Arc::new(Mutex::new(Some(file_writer))),
            config,
            tail_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(100))),
        })
    }

    /// Get the run name.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a section marker.
    pub fn section(&self, section_name: &str) {
        let msg = MessagePrefix::Section.format(section_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Log command output line (stdout/stderr from external tools).
    ///
    /// In compact mode, these are only added to the tail buffer.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut buffer = self.tail_buffer.lock();
            if buffer.len() >= self.config.error_tail {
                buffer.pop_front();
            }
            buffer.push_back(line.to_string());
        }

        if self.config.compact {
            return;
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        let msg = format!("{}{}", prefix, line);
        self.output(&self.format_message(&msg));
    }

    /// Show the tail buffer (typically after an error).
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    /// Clear the tail buffer.
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Get the current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the logger and release resources.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    /// Format a message with timestamp (if enabled).
    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    /// Output a formatted message to file and (optionally) stderr.
    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if self.config.echo {
            eprintln!("{}", formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a string to be safe for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("test_run", dir.path(), LogConfig::default()).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().to_string_lossy().contains("test_run.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("test_run", dir.path(), LogConfig::default()).unwrap();

        logger.info("Test message");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("Test message"));
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            error_tail: 5,
            ..LogConfig::default()
        };

        let logger = RunLogger::new("test_run", dir.path(), config).unwrap();

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), false);
        }

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");
    }

    #[test]
    fn compact_mode_keeps_tool_output_out_of_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("test_run", dir.path(), LogConfig::default()).unwrap();

        logger.output_line("frame=  42", true);
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("frame=  42"));

        // The tail replay writes the buffered lines out
        logger.show_tail("ffmpeg");
        logger.flush();
        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("frame=  42"));
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
    }
}
