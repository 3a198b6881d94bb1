//! TeamCity event translator
//!
//! Turns the two lifecycle notifications of a test case into service
//! messages, written to the sink as soon as they are produced:
//!
//! ```text
//! case started   -> [testSuiteStarted] testStarted
//! case finished  -> [testFailed | testIgnored] testFinished [testSuiteFinished]
//! ```
//!
//! The bracketed suite messages are emitted only for the first and last
//! runnable position of the case's document. The translator keeps no state
//! between events besides the sink.

use std::io::Write;

use crate::collector::{CaseData, EventDataLookup};
use crate::document::resolve_position;
use crate::error::ReportError;
use crate::event::TestCaseRef;
use crate::message::ServiceMessage;
use crate::outcome::{classify, OutcomeAction, Status};
use crate::render::{FailureRenderer, IssueRenderer, RenderOptions};

/// Only the first failure of a case is surfaced
const ISSUE_NUMBER: usize = 1;

/// Which end of a suite a case is being checked for
#[derive(Clone, Copy)]
enum Boundary {
    First,
    Last,
}

/// Writes TeamCity service messages for test case events
pub struct TeamCityFormatter<W: Write, R: FailureRenderer = IssueRenderer> {
    out: W,
    renderer: R,
    render_options: RenderOptions,
}

impl<W: Write> TeamCityFormatter<W> {
    /// Create a formatter writing to `out` with the default issue renderer
    pub fn new(out: W) -> Self {
        Self::with_renderer(out, IssueRenderer)
    }
}

impl<W: Write, R: FailureRenderer> TeamCityFormatter<W, R> {
    /// Create a formatter with a custom failure renderer.
    ///
    /// Colors are always off: ANSI codes would corrupt the wire format.
    pub fn with_renderer(out: W, renderer: R) -> Self {
        Self {
            out,
            renderer,
            render_options: RenderOptions { colors: false },
        }
    }

    /// Handle a `test-case-started` notification
    pub fn on_case_started<L>(&mut self, lookup: &L, case: &TestCaseRef) -> Result<(), ReportError>
    where
        L: EventDataLookup + ?Sized,
    {
        let Some(data) = lookup.case_data(case) else {
            tracing::warn!(?case, "test case started with no known document or pickle");
            return Ok(());
        };

        if at_boundary(&data, case, Boundary::First) {
            self.emit(&ServiceMessage::suite_started(data.document.feature_name()))?;
        }
        self.emit(&ServiceMessage::test_started(data.name()))
    }

    /// Handle a `test-case-finished` notification.
    ///
    /// Returns the outcome action taken, or `None` if the case was unknown.
    pub fn on_case_finished<L>(
        &mut self,
        lookup: &L,
        case: &TestCaseRef,
    ) -> Result<Option<OutcomeAction>, ReportError>
    where
        L: EventDataLookup + ?Sized,
    {
        let Some(data) = lookup.case_data(case) else {
            tracing::warn!(?case, "test case finished with no known document or pickle");
            return Ok(None);
        };

        let (status, duration) = match data.result {
            Some(result) => (result.status.clone(), result.duration),
            None => {
                tracing::warn!(?case, "test case finished without a result");
                (Status::Unknown(String::new()), 0)
            }
        };

        let action = classify(&status);
        match action {
            OutcomeAction::Failed => {
                let details = self.renderer.render(ISSUE_NUMBER, &data, &self.render_options);
                self.emit(&ServiceMessage::test_failed(data.name(), details))?;
            }
            OutcomeAction::Ignored => {
                self.emit(&ServiceMessage::test_ignored(data.name()))?;
            }
            OutcomeAction::None => {}
        }
        self.emit(&ServiceMessage::test_finished(data.name(), duration))?;

        if at_boundary(&data, case, Boundary::Last) {
            self.emit(&ServiceMessage::suite_finished(data.document.feature_name()))?;
        }
        Ok(Some(action))
    }

    /// Flush the sink
    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.out.flush()?;
        Ok(())
    }

    /// Get the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, msg: &ServiceMessage) -> Result<(), ReportError> {
        tracing::trace!(kind = msg.kind(), "emit");
        self.out.write_all(msg.render().as_bytes())?;
        Ok(())
    }
}

fn at_boundary(data: &CaseData<'_>, case: &TestCaseRef, boundary: Boundary) -> bool {
    match resolve_position(data.document, &case.source_location) {
        Some(pos) => match boundary {
            Boundary::First => pos.is_first(),
            Boundary::Last => pos.is_last(),
        },
        None => {
            tracing::debug!(
                uri = %case.source_location.uri,
                line = case.source_location.line,
                "test case position not found in its document; no suite boundary"
            );
            false
        }
    }
}
