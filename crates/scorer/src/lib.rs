//! Client for the external recommendation scorer.
//!
//! The scorer is a separate program (the platform ships a Python script)
//! that prints ranked course suggestions for one student on stdout. This
//! crate handles:
//! - Launching the scorer with the student id and result limit
//! - Capturing stdout and stderr to completion
//! - Bounding the wait with a timeout and killing stuck processes
//! - Limiting how many scorer processes run at once
//!
//! Decoding the output is not done here; see the `pipeline` crate.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod process;

pub use process::{ProcessScorer, ScorerConfig};

/// Errors that can occur when invoking the scorer
#[derive(Error, Debug)]
pub enum ScorerError {
    /// The scorer process could not be started at all
    #[error("Failed to launch scorer '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The scorer ran but reported failure. Any stdout it produced is dropped.
    #[error("Scorer exited with {}: {}", describe_exit(.code), diagnostics(.stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The scorer did not finish in time and was killed
    #[error("Scorer did not finish within {after:?}")]
    Timeout { after: Duration },

    /// Waiting on the scorer's output streams failed
    #[error("I/O error while waiting for scorer: {0}")]
    Io(#[from] std::io::Error),

    /// The process limiter has been shut down
    #[error("Scorer is not accepting new invocations")]
    Unavailable,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

fn diagnostics(stderr: &str) -> &str {
    stderr.trim()
}

/// Produces the raw recommendation text for a student.
///
/// `Send + Sync` so one scorer can be shared by all request tasks.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Run the scorer for `student_id`, asking for at most `limit` results.
    ///
    /// # Returns
    /// The complete standard output of a successful run
    async fn invoke(&self, student_id: u32, limit: usize) -> Result<String, ScorerError>;
}
