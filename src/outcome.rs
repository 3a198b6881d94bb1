//! Test results and outcome classification

use std::fmt;

use serde::Deserialize;

/// Status of a finished test step or test case
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Status {
    Passed,
    Failed,
    Ambiguous,
    Skipped,
    Pending,
    Undefined,
    /// A status string this crate does not know about
    Unknown(String),
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "ambiguous" => Self::Ambiguous,
            "skipped" => Self::Skipped,
            "pending" => Self::Pending,
            "undefined" => Self::Undefined,
            _ => Self::Unknown(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Ambiguous => "ambiguous",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Undefined => "undefined",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error attached to a failed or ambiguous result.
///
/// Runners serialize it either as a bare message or as an error object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Exception {
    Message(String),
    Error {
        #[serde(default)]
        message: String,
        #[serde(default)]
        stack: Option<String>,
    },
}

impl Exception {
    /// The most detailed text available: the stack trace when present
    pub fn text(&self) -> &str {
        match self {
            Self::Message(m) => m.as_str(),
            Self::Error { stack: Some(stack), .. } if !stack.is_empty() => stack.as_str(),
            Self::Error { message, .. } => message.as_str(),
        }
    }
}

/// The result of a test step or test case
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestResult {
    pub status: Status,
    /// Milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub exception: Option<Exception>,
}

impl TestResult {
    pub fn new(status: impl Into<Status>, duration: u64) -> Self {
        Self { status: status.into(), duration, exception: None }
    }

    pub fn with_exception(mut self, msg: impl Into<String>) -> Self {
        self.exception = Some(Exception::Message(msg.into()));
        self
    }
}

/// The outcome-specific message a finished case produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeAction {
    /// Nothing beyond `testFinished`
    None,
    /// `testFailed` with rendered details
    Failed,
    /// `testIgnored`
    Ignored,
}

/// Map a case status to the message emitted before `testFinished`.
///
/// Unknown statuses fall through to `None` so the case still finishes.
pub fn classify(status: &Status) -> OutcomeAction {
    match status {
        Status::Failed | Status::Ambiguous => OutcomeAction::Failed,
        Status::Skipped => OutcomeAction::Ignored,
        Status::Passed | Status::Pending | Status::Undefined | Status::Unknown(_) => {
            OutcomeAction::None
        }
    }
}
