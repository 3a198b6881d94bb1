//! TeamCity service messages
//!
//! Each message renders to a single physical line of the form
//! `##teamcity[kind key='value' ...]` followed by a newline. Field values are
//! stored raw and escaped exactly once, at render time.

use std::fmt;

use crate::escape::escape;

/// A single TeamCity service message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceMessage {
    /// A feature began
    SuiteStarted { name: String },
    /// A feature ended
    SuiteFinished { name: String },
    /// A scenario began. Standard output capture is always enabled.
    TestStarted { name: String },
    /// A scenario ended after `duration_ms` milliseconds
    TestFinished { name: String, duration_ms: u64 },
    /// A scenario failed
    TestFailed { name: String, message: String, details: String },
    /// A scenario was skipped
    TestIgnored { name: String },
}

impl ServiceMessage {
    pub fn suite_started(name: impl Into<String>) -> Self {
        Self::SuiteStarted { name: name.into() }
    }

    pub fn suite_finished(name: impl Into<String>) -> Self {
        Self::SuiteFinished { name: name.into() }
    }

    pub fn test_started(name: impl Into<String>) -> Self {
        Self::TestStarted { name: name.into() }
    }

    pub fn test_finished(name: impl Into<String>, duration_ms: u64) -> Self {
        Self::TestFinished { name: name.into(), duration_ms }
    }

    /// Build a `testFailed` message with the conventional `"<name> FAILED"` message.
    pub fn test_failed(name: impl Into<String>, details: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("{} FAILED", name);
        Self::TestFailed { name, message, details: details.into() }
    }

    pub fn test_ignored(name: impl Into<String>) -> Self {
        Self::TestIgnored { name: name.into() }
    }

    /// The wire name of this message kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SuiteStarted { .. } => "testSuiteStarted",
            Self::SuiteFinished { .. } => "testSuiteFinished",
            Self::TestStarted { .. } => "testStarted",
            Self::TestFinished { .. } => "testFinished",
            Self::TestFailed { .. } => "testFailed",
            Self::TestIgnored { .. } => "testIgnored",
        }
    }

    /// Render the full line, including the trailing newline.
    pub fn render(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "##teamcity[{}", self.kind())?;
        match self {
            Self::SuiteStarted { name }
            | Self::SuiteFinished { name }
            | Self::TestIgnored { name } => {
                write!(f, " name='{}'", escape(name))?;
            }
            Self::TestStarted { name } => {
                write!(f, " name='{}' captureStandardOutput='true'", escape(name))?;
            }
            Self::TestFinished { name, duration_ms } => {
                write!(f, " name='{}' duration='{}'", escape(name), duration_ms)?;
            }
            Self::TestFailed { name, message, details } => {
                write!(
                    f,
                    " name='{}' message='{}' details='{}'",
                    escape(name),
                    escape(message),
                    escape(details),
                )?;
            }
        }
        write!(f, "]")
    }
}
