//! External renderer invocation
//!
//! Runs a [`RenderJob`] as a child process with a bounded wait. stderr goes
//! to an anonymous temporary file so a chatty renderer can never block on a
//! full pipe while we poll for its exit.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{PdfError, Result};
use crate::job::RenderJob;

/// Default limit for one render
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs render jobs
#[derive(Debug, Clone)]
pub struct PandocRunner {
    timeout: Duration,
}

impl Default for PandocRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PandocRunner {
    /// Runner with the given time limit
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Configured time limit
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the job and wait for it
    ///
    /// # Errors
    ///
    /// - [`PdfError::Spawn`] if the program cannot be started
    /// - [`PdfError::RendererFailed`] on a non-zero exit, with captured stderr
    /// - [`PdfError::Timeout`] if the limit expires; the child is killed and
    ///   whatever it already wrote is left in place
    pub fn run(&self, job: &RenderJob) -> Result<()> {
        let started_at = Instant::now();
        info!(command = %job.command_line(), "starting renderer");

        let mut stderr_file = tempfile::tempfile()?;
        let mut child = Command::new(&job.program)
            .args(job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file.try_clone()?))
            .spawn()
            .map_err(|source| PdfError::Spawn {
                program: job.program.clone(),
                source,
            })?;

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started_at.elapsed() >= self.timeout {
                match child.kill() {
                    Ok(()) => {}
                    // exited between the poll and the kill
                    Err(err) if err.kind() == ErrorKind::InvalidInput => {}
                    Err(err) => return Err(err.into()),
                }
                let _ = child.wait()?;
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    output = %job.output_pdf.display(),
                    "renderer timed out and was killed"
                );
                return Err(PdfError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let elapsed_ms = started_at.elapsed().as_millis() as u64;
        if !status.success() {
            let stderr = read_captured(&mut stderr_file)?;
            warn!(
                exit_code = status.code().unwrap_or(-1),
                elapsed_ms,
                stderr = %stderr,
                "renderer failed"
            );
            return Err(failure(status, stderr));
        }

        debug!(elapsed_ms, "renderer exited cleanly");
        info!(output = %job.output_pdf.display(), elapsed_ms, "pdf written");
        Ok(())
    }
}

fn read_captured(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

fn failure(status: ExitStatus, stderr: String) -> PdfError {
    PdfError::RendererFailed {
        exit_code: status.code(),
        stderr,
    }
}
