//! Command runner for external process execution.
//!
//! Logs each command through the run logger, captures stdout/stderr into
//! the tail buffer, and replays the tail when a command fails.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::logging::RunLogger;

use super::{MediaError, MediaResult};

/// Poll interval while waiting on a deadlined child process.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured output of a completed command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run an external tool to completion.
///
/// The command line is logged, output lines go to the logger's tail
/// buffer, and a non-zero exit becomes `MediaError::CommandFailed` with
/// the tail replayed into the log.
pub fn run_tool(
    logger: &RunLogger,
    tool: &str,
    program: &Path,
    args: &[String],
) -> MediaResult<CommandOutput> {
    logger.command(&format_command(program, args));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| MediaError::io(format!("spawning {}", tool), e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stdout.lines() {
        logger.output_line(line, false);
    }
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    let exit_code = output.status.code().unwrap_or(-1);

    if !output.status.success() {
        logger.show_tail(&format!("{} output", tool));
        return Err(MediaError::CommandFailed {
            tool: tool.to_string(),
            exit_code,
            message: last_meaningful_line(&stderr),
        });
    }

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

/// Run an external tool with a hard deadline.
///
/// The child is polled and killed once the deadline passes; a timeout is
/// reported as `MediaError::Timeout`. Used for speech synthesis, where a
/// wedged collaborator must not stall the whole run.
pub fn run_tool_with_timeout(
    logger: &RunLogger,
    tool: &str,
    program: &Path,
    args: &[String],
    timeout: Duration,
) -> MediaResult<CommandOutput> {
    logger.command(&format_command(program, args));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| MediaError::io(format!("spawning {}", tool), e))?;

    // The pipes must be drained while the child runs; otherwise a chatty
    // collaborator blocks on a full pipe, never exits, and a successful
    // synthesis would be misreported as a timeout.
    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let timed_out = loop {
        match child.try_wait() {
            Ok(Some(_)) => break false,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    break true;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(MediaError::io(format!("waiting for {}", tool), e));
            }
        }
    };

    // Reap the child (a no-op when try_wait already did) and collect
    // whatever the readers captured, including a killed child's partial
    // output.
    let status = child
        .wait()
        .map_err(|e| MediaError::io(format!("waiting for {}", tool), e))?;
    let stdout = join_pipe_reader(stdout_reader);
    let stderr = join_pipe_reader(stderr_reader);

    for line in stdout.lines() {
        logger.output_line(line, false);
    }
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    if timed_out {
        logger.show_tail(&format!("{} output", tool));
        return Err(MediaError::Timeout {
            tool: tool.to_string(),
            seconds: timeout.as_secs(),
        });
    }

    let exit_code = status.code().unwrap_or(-1);

    if !status.success() {
        logger.show_tail(&format!("{} output", tool));
        return Err(MediaError::CommandFailed {
            tool: tool.to_string(),
            exit_code,
            message: last_meaningful_line(&stderr),
        });
    }

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

/// Drain a child pipe on a background thread.
fn spawn_pipe_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<std::thread::JoinHandle<String>> {
    pipe.map(|mut reader| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

/// Collect a pipe reader's captured output.
fn join_pipe_reader(handle: Option<std::thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Render a command line for the log.
fn format_command(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            line.push('\'');
            line.push_str(arg);
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// Pick the last non-blank stderr line as the failure summary.
fn last_meaningful_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use tempfile::tempdir;

    fn logger() -> (tempfile::TempDir, RunLogger) {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("runner_test", dir.path(), LogConfig::default()).unwrap();
        (dir, logger)
    }

    #[test]
    fn runs_successful_command() {
        let (_dir, logger) = logger();
        let out = run_tool(&logger, "true", Path::new("true"), &[]).unwrap();
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn reports_failing_command() {
        let (_dir, logger) = logger();
        let err = run_tool(&logger, "false", Path::new("false"), &[]).unwrap_err();
        match err {
            MediaError::CommandFailed {
                tool, exit_code, ..
            } => {
                assert_eq!(tool, "false");
                assert_ne!(exit_code, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_missing_program() {
        let (_dir, logger) = logger();
        let err = run_tool(
            &logger,
            "missing",
            Path::new("/no/such/binary-xyz"),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }

    #[test]
    fn kills_command_past_deadline() {
        let (_dir, logger) = logger();
        let err = run_tool_with_timeout(
            &logger,
            "sleep",
            Path::new("sleep"),
            &["5".to_string()],
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::Timeout { tool, .. } if tool == "sleep"));
    }

    #[test]
    fn timeout_variant_drains_chatty_commands() {
        // Far more output than a pipe buffer holds; the command must
        // still complete well inside the deadline.
        let (_dir, logger) = logger();
        let out = run_tool_with_timeout(
            &logger,
            "chatty",
            Path::new("sh"),
            &["-c".to_string(), "seq 1 20000".to_string()],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("20000"));
    }

    #[test]
    fn timeout_variant_passes_fast_commands() {
        let (_dir, logger) = logger();
        let out = run_tool_with_timeout(
            &logger,
            "echo",
            Path::new("echo"),
            &["hello".to_string()],
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(out.stdout.contains("hello"));
    }

    #[test]
    fn last_meaningful_line_picks_final_nonblank() {
        assert_eq!(last_meaningful_line("a\nb\n\n  \n"), "b");
        assert_eq!(last_meaningful_line(""), "no error output");
    }

    #[test]
    fn format_command_quotes_spaces() {
        let line = format_command(
            Path::new("ffmpeg"),
            &["-i".to_string(), "my file.png".to_string()],
        );
        assert_eq!(line, "ffmpeg -i 'my file.png'");
    }
}
