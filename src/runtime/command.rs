use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::container::ContainerID;

use super::{ContainerRuntime, Error, InspectDocument, Result};

/// How often a failed runtime call is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, at least one.
    pub attempts: u32,
    /// Delay before the second attempt; grows linearly with every further attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self {
            attempts: retries.saturating_add(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(0, Duration::from_millis(500))
    }
}

/// Queries a docker-compatible runtime CLI (`podman`, `docker`, `nerdctl`, ...).
#[derive(Debug, Clone)]
pub struct CommandRuntime {
    program: OsString,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CommandRuntime {
    pub fn new(program: impl Into<OsString>, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            program: program.into(),
            timeout,
            retry,
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.to_string_lossy().into_owned();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    /// Runs the runtime with `args`, retrying according to the [`RetryPolicy`].
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.run_once(args).await {
                Ok(stdout) => return Ok(stdout),
                Err(err) if attempt < attempts => {
                    let delay = self.retry.backoff * attempt;
                    log::warn!(
                        "attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn run_once(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = self.describe(args);
        log::trace!("Running `{}`", command);

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(Error::Spawn { command, source }),
            Err(_) => {
                return Err(Error::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(Error::ExitStatus {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(output.stdout)
    }
}

impl ContainerRuntime for CommandRuntime {
    async fn list_running(&self) -> Result<Vec<ContainerID>> {
        let stdout = self.run(&["ps", "-q", "--no-trunc"]).await?;
        Ok(parse_container_ids(&String::from_utf8_lossy(&stdout)))
    }

    async fn inspect(&self, id: &ContainerID) -> Result<Option<InspectDocument>> {
        let args = ["inspect", "--type", "container", id.as_str()];
        let stdout = self.run(&args).await?;
        parse_inspect_output(&stdout).map_err(|source| Error::Decode {
            command: self.describe(&args),
            source,
        })
    }
}

/// Parses the line-oriented output of `ps -q`, skipping blank and malformed lines.
fn parse_container_ids(stdout: &str) -> Vec<ContainerID> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match ContainerID::new(line) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("ignoring container listing entry: {}", err);
                None
            }
        })
        .collect()
}

/// Parses the JSON array printed by `inspect`. An empty array or empty output yields `None`.
fn parse_inspect_output(stdout: &[u8]) -> serde_json::Result<Option<InspectDocument>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let documents: Vec<InspectDocument> = serde_json::from_slice(stdout)?;
    Ok(documents.into_iter().next())
}
