//! Runner lifecycle events
//!
//! The event log is newline-delimited JSON, one object per line, tagged by a
//! kebab-case `"type"` field. Event kinds this crate has no use for
//! deserialize to [`Event::Other`].

use serde::Deserialize;

use crate::document::{Document, Pickle, SourceLocation};
use crate::outcome::TestResult;

/// Identifies one attempt at running a test case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRef {
    #[serde(default)]
    pub attempt_number: u32,
    pub source_location: SourceLocation,
}

impl TestCaseRef {
    pub fn new(uri: impl Into<String>, line: u32, attempt_number: u32) -> Self {
        Self {
            attempt_number,
            source_location: SourceLocation::new(uri, line),
        }
    }
}

/// A test step as announced by `test-case-prepared`.
///
/// Hook steps carry no source location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedStep {
    #[serde(default)]
    pub source_location: Option<SourceLocation>,
}

/// A runner event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    GherkinDocument {
        uri: String,
        document: Document,
    },
    Pickle {
        uri: String,
        pickle: Pickle,
    },
    PickleAccepted {
        uri: String,
        pickle: Pickle,
    },
    #[serde(rename_all = "camelCase")]
    TestCasePrepared {
        source_location: SourceLocation,
        #[serde(default)]
        steps: Vec<PreparedStep>,
    },
    TestCaseStarted(TestCaseRef),
    #[serde(rename_all = "camelCase")]
    TestStepFinished {
        index: usize,
        test_case: TestCaseRef,
        result: TestResult,
    },
    #[serde(rename_all = "camelCase")]
    TestCaseFinished {
        #[serde(default)]
        attempt_number: u32,
        source_location: SourceLocation,
        result: TestResult,
    },
    /// `test-run-started`, `test-run-finished`, `source` and anything newer
    #[serde(other)]
    Other,
}

impl Event {
    /// Parse one line of an event log
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
