//! emx-teamcity: TeamCity service messages for BDD test runs
//!
//! Translates the lifecycle events of a behavior-driven test runner into
//! [TeamCity service messages](https://www.jetbrains.com/help/teamcity/service-messages.html),
//! so a CI server can render live progress for every feature and scenario.
//!
//! # Overview
//!
//! The runner never announces suites. Suite boundaries are inferred from the
//! feature document itself: the first runnable scenario opens the suite and
//! the last one closes it.
//!
//! ```text
//! ##teamcity[testSuiteStarted name='my feature']
//! ##teamcity[testStarted name='my scenario' captureStandardOutput='true']
//! ##teamcity[testFailed name='my scenario' message='my scenario FAILED' details='1) Scenario: ...']
//! ##teamcity[testFinished name='my scenario' duration='15']
//! ##teamcity[testSuiteFinished name='my feature']
//! ```
//!
//! # Outcomes
//!
//! | Case status | Extra message |
//! |-------------|---------------|
//! | `failed`, `ambiguous` | `testFailed` |
//! | `skipped` | `testIgnored` |
//! | `passed`, `pending`, `undefined` | none |
//!
//! # Event log
//!
//! [`replay`] reads newline-delimited JSON, one runner event per line:
//!
//! ```text
//! {"type": "gherkin-document", "uri": "a.feature", "document": {...}}
//! {"type": "pickle-accepted", "uri": "a.feature", "pickle": {...}}
//! {"type": "test-case-started", "attemptNumber": 1, "sourceLocation": {"uri": "a.feature", "line": 4}}
//! {"type": "test-case-finished", "attemptNumber": 1, "sourceLocation": {...}, "result": {"status": "passed", "duration": 1}}
//! ```

mod escape;
mod message;
mod document;
mod outcome;
mod event;
mod collector;
mod render;
mod formatter;
mod runner;
mod error;

pub use escape::escape;
pub use message::ServiceMessage;
pub use document::{
    resolve_position, CasePosition, Child, Document, Examples, Feature, Location, Pickle,
    PickleStep, SourceLocation, Step, TableRow,
};
pub use outcome::{classify, Exception, OutcomeAction, Status, TestResult};
pub use event::{Event, PreparedStep, TestCaseRef};
pub use collector::{CaseData, EventDataCollector, EventDataLookup, TestStep};
pub use render::{FailureRenderer, IssueRenderer, RenderOptions};
pub use formatter::TeamCityFormatter;
pub use runner::{Reporter, ReporterBuilder, ReplaySummary, RunConfig};
pub use error::{ReportError, ErrorKind};

// Convenience functions
pub use runner::{replay, reporter};
