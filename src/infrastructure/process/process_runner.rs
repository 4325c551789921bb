use async_trait::async_trait;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::common::error::SrcinitError;
use crate::common::result::SrcinitResult;

/// Runs external commands to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, in `working_dir` when given.
    ///
    /// Resolves once the process has exited. A non-zero exit or a spawn
    /// failure yields [`SrcinitError::ProcessError`].
    async fn run(
        &self,
        working_dir: Option<&Path>,
        program: &str,
        args: &[OsString],
    ) -> SrcinitResult<()>;
}

/// Render a command line for logs and error messages
///
/// Arguments that are not valid UTF-8 are rendered lossily; the rendering is
/// never used to launch anything.
pub fn format_command(program: &str, args: &[OsString]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        let arg = arg.to_string_lossy();
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push('\'');
            rendered.push_str(&arg.replace('\'', "'\\''"));
            rendered.push('\'');
        } else {
            rendered.push_str(&arg);
        }
    }
    rendered
}

/// Runs commands with tokio, inheriting stdin/stdout and teeing stderr
#[derive(Debug, Default, Clone)]
pub struct SystemProcessRunner {
    verbose: bool,
    dry_run: bool,
}

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log each command line before running it
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Log commands without running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(
        &self,
        working_dir: Option<&Path>,
        program: &str,
        args: &[OsString],
    ) -> SrcinitResult<()> {
        let command_line = format_command(program, args);

        if self.verbose || self.dry_run {
            match working_dir {
                Some(dir) => tracing::info!("( cd {} && {} )", dir.display(), command_line),
                None => tracing::info!("{}", command_line),
            }
        }
        if self.dry_run {
            return Ok(());
        }

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| SrcinitError::process_error(&command_line, None, e.to_string()))?;

        // Raw bytes: VCS output is not guaranteed to be UTF-8
        let mut captured = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            let mut reader = BufReader::new(stderr);
            let mut line = Vec::new();
            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let _ = std::io::stderr().write_all(&line);
                        captured.extend_from_slice(&line);
                    }
                    Err(e) => {
                        tracing::warn!(command = %command_line, error = %e, "stopped reading stderr");
                        break;
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SrcinitError::internal_error_with_source("failed to wait for process", e))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&captured);
            return Err(SrcinitError::process_error(
                command_line,
                Some(status.code().unwrap_or(-1)),
                stderr.trim_end(),
            ));
        }

        tracing::debug!(command = %command_line, "command completed");
        Ok(())
    }
}
