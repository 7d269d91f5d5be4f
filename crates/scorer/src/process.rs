//! Scorer backed by an external process.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::{Scorer, ScorerError};

/// How to launch the scorer.
///
/// The command line is
/// `program [args...] <student_id> <limit> [trailing_args...]`, which for
/// the stock Python scorer is
/// `python3 ai/recommend.py <student_id> <limit> ai/recommendation_model.pkl`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScorerConfig {
    /// Executable to run
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the student id and limit
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Arguments placed after the student id and limit
    #[serde(default = "default_trailing_args")]
    pub trailing_args: Vec<String>,

    /// Working directory for the scorer; inherited when unset
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Hard limit on a single run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of scorer processes alive at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["ai/recommend.py".to_string()]
}

fn default_trailing_args() -> Vec<String> {
    vec!["ai/recommendation_model.pkl".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            trailing_args: default_trailing_args(),
            working_dir: None,
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Runs the scorer as a child process, one process per invocation.
///
/// The child is spawned with `kill_on_drop`, so when the invocation future
/// is dropped (timeout, or the HTTP client went away) the process is killed
/// rather than left running.
#[derive(Clone)]
pub struct ProcessScorer {
    config: ScorerConfig,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl ProcessScorer {
    pub fn new(config: ScorerConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        info!(
            "Scorer configured: {} {:?} (timeout {:?}, max {} concurrent)",
            config.program,
            config.args,
            timeout,
            config.max_concurrent.max(1)
        );
        Self {
            config,
            timeout,
            permits,
        }
    }

    /// Override the timeout derived from `timeout_secs`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    fn command(&self, student_id: u32, limit: usize) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(student_id.to_string())
            .arg(limit.to_string())
            .args(&self.config.trailing_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl Scorer for ProcessScorer {
    async fn invoke(&self, student_id: u32, limit: usize) -> Result<String, ScorerError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ScorerError::Unavailable)?;

        let start_time = Instant::now();
        debug!(
            "Launching scorer for student {} (limit {})",
            student_id, limit
        );

        let child = self
            .command(student_id, limit)
            .spawn()
            .map_err(|source| {
                error!("Failed to launch scorer {}: {}", self.config.program, source);
                ScorerError::Launch {
                    program: self.config.program.clone(),
                    source,
                }
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(
                    "Scorer for student {} exceeded {:?}, killed",
                    student_id, self.timeout
                );
                return Err(ScorerError::Timeout {
                    after: self.timeout,
                });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            error!(
                "Scorer for student {} failed ({}): {}",
                student_id,
                output.status,
                stderr.trim()
            );
            return Err(ScorerError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            debug!("Scorer stderr: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "Scorer for student {} finished in {:.2?} ({} bytes)",
            student_id,
            start_time.elapsed(),
            stdout.len()
        );
        Ok(stdout)
    }
}
