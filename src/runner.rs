//! Reporter and event log replay
//!
//! The [`Reporter`] wires an [`EventDataCollector`] to a [`TeamCityFormatter`]:
//! every event is recorded first, then `test-case-started` and
//! `test-case-finished` are forwarded to the formatter. [`Reporter::replay`]
//! drives it from a newline-delimited JSON event log.

use std::io::{BufRead, Write};

use crate::collector::EventDataCollector;
use crate::error::ReportError;
use crate::event::{Event, TestCaseRef};
use crate::formatter::TeamCityFormatter;
use crate::outcome::OutcomeAction;
use crate::render::{FailureRenderer, IssueRenderer};

/// Configuration for a replay
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Abort on the first malformed event log line instead of skipping it
    pub strict: bool,
    /// Name of the event log, used in error messages
    pub source_name: Option<String>,
}

/// Counts gathered while replaying an event log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events handled
    pub events: usize,
    /// Malformed lines skipped (non-strict mode only)
    pub skipped_lines: usize,
    /// Finished cases with no outcome-specific message
    pub finished: usize,
    /// Finished cases reported as `testFailed`
    pub failed: usize,
    /// Finished cases reported as `testIgnored`
    pub ignored: usize,
}

impl ReplaySummary {
    /// Total finished test cases
    pub fn total_cases(&self) -> usize {
        self.finished + self.failed + self.ignored
    }

    /// Check if no case failed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Format a summary line
    pub fn summary(&self) -> String {
        format!(
            "{} test case(s): {} failed, {} ignored ({} events, {} malformed lines skipped)",
            self.total_cases(),
            self.failed,
            self.ignored,
            self.events,
            self.skipped_lines,
        )
    }
}

/// Feeds runner events to a collector and a TeamCity formatter
pub struct Reporter<W: Write, R: FailureRenderer = IssueRenderer> {
    collector: EventDataCollector,
    formatter: TeamCityFormatter<W, R>,
    config: RunConfig,
    summary: ReplaySummary,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out` with default settings
    pub fn new(out: W) -> Self {
        Self::with_formatter(TeamCityFormatter::new(out), RunConfig::default())
    }
}

impl<W: Write, R: FailureRenderer> Reporter<W, R> {
    pub fn with_formatter(formatter: TeamCityFormatter<W, R>, config: RunConfig) -> Self {
        Self {
            collector: EventDataCollector::new(),
            formatter,
            config,
            summary: ReplaySummary::default(),
        }
    }

    /// Handle one event. Sink failures are returned as-is.
    pub fn handle(&mut self, event: &Event) -> Result<(), ReportError> {
        self.collector.record(event);
        self.summary.events += 1;

        match event {
            Event::TestCaseStarted(case) => {
                self.formatter.on_case_started(&self.collector, case)?;
            }
            Event::TestCaseFinished { attempt_number, source_location, .. } => {
                let case = TestCaseRef {
                    attempt_number: *attempt_number,
                    source_location: source_location.clone(),
                };
                match self.formatter.on_case_finished(&self.collector, &case)? {
                    Some(OutcomeAction::None) => self.summary.finished += 1,
                    Some(OutcomeAction::Failed) => self.summary.failed += 1,
                    Some(OutcomeAction::Ignored) => self.summary.ignored += 1,
                    None => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Replay a newline-delimited JSON event log, then flush the sink.
    ///
    /// Lines that are not UTF-8 or not a valid event are malformed: skipped
    /// with a warning, or returned as a `Parse` error in strict mode.
    pub fn replay<B: BufRead>(&mut self, input: B) -> Result<ReplaySummary, ReportError> {
        for (i, line) in input.split(b'\n').enumerate() {
            let line_number = i + 1;
            let line = line?;

            let event = match parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    let err = self.locate(e, line_number);
                    if self.config.strict {
                        return Err(err);
                    }
                    tracing::warn!(error = %err, "skipping malformed event");
                    self.summary.skipped_lines += 1;
                    continue;
                }
            };

            self.handle(&event)?;
        }

        self.formatter.flush()?;
        tracing::debug!(documents = self.collector.document_count(), "replay finished");
        Ok(self.summary.clone())
    }

    /// Counts so far
    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    /// Get the sink back
    pub fn into_inner(self) -> W {
        self.formatter.into_inner()
    }

    fn locate(&self, err: ReportError, line: usize) -> ReportError {
        let err = err.with_line(line);
        match self.config.source_name {
            Some(ref name) => err.with_source_name(name.clone()),
            None => err,
        }
    }
}

/// Parse one raw event log line. Blank lines yield `None`.
fn parse_line(raw: &[u8]) -> Result<Option<Event>, ReportError> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| ReportError::parse(format!("invalid UTF-8: {}", e)))?;
    if line.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Event::from_json(line)?))
}

/// Builder API for convenient reporter construction
pub struct ReporterBuilder<W: Write, R: FailureRenderer = IssueRenderer> {
    out: W,
    renderer: R,
    config: RunConfig,
}

impl<W: Write> ReporterBuilder<W> {
    /// Start building a reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            renderer: IssueRenderer,
            config: RunConfig::default(),
        }
    }
}

impl<W: Write, R: FailureRenderer> ReporterBuilder<W, R> {
    /// Abort on malformed event log lines
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Name the event log in error messages
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.config.source_name = Some(name.into());
        self
    }

    /// Use a custom failure renderer
    pub fn renderer<R2: FailureRenderer>(self, renderer: R2) -> ReporterBuilder<W, R2> {
        ReporterBuilder {
            out: self.out,
            renderer,
            config: self.config,
        }
    }

    /// Build and return the reporter
    pub fn build(self) -> Reporter<W, R> {
        Reporter::with_formatter(TeamCityFormatter::with_renderer(self.out, self.renderer), self.config)
    }

    /// Build and replay an event log
    pub fn replay<B: BufRead>(self, input: B) -> Result<ReplaySummary, ReportError> {
        self.build().replay(input)
    }
}

/// Convenience function: create a reporter builder for a sink
pub fn reporter<W: Write>(out: W) -> ReporterBuilder<W> {
    ReporterBuilder::new(out)
}

/// Replay `input` into `out` with default settings.
///
/// ```rust,ignore
/// let stdin = std::io::stdin();
/// emx_teamcity::replay(stdin.lock(), std::io::stdout())?;
/// ```
pub fn replay<B: BufRead, W: Write>(input: B, out: W) -> Result<ReplaySummary, ReportError> {
    Reporter::new(out).replay(input)
}
