//! Event data collection
//!
//! The translator never sees full payloads on the events it reacts to: a
//! `test-case-started` carries only a [`TestCaseRef`]. Everything else (the
//! document, the pickle name, step results) is looked up through
//! [`EventDataLookup`], whose default implementation is the
//! [`EventDataCollector`] fed with every event of the run.

use std::collections::HashMap;

use crate::document::{Document, Pickle, SourceLocation};
use crate::event::{Event, PreparedStep, TestCaseRef};
use crate::outcome::TestResult;

/// A test step of one case attempt, with its result once finished
#[derive(Debug, Clone, Default)]
pub struct TestStep {
    /// Source line of the step; `None` for hooks
    pub source_line: Option<u32>,
    pub result: Option<TestResult>,
}

/// Everything known about one test case attempt
#[derive(Debug, Clone, Copy)]
pub struct CaseData<'a> {
    pub document: &'a Document,
    pub pickle: &'a Pickle,
    /// Present once the case has finished
    pub result: Option<&'a TestResult>,
    pub steps: &'a [TestStep],
}

impl<'a> CaseData<'a> {
    /// The case name shown to the CI server
    pub fn name(&self) -> &'a str {
        &self.pickle.name
    }
}

/// Resolves a test case reference to its full data
pub trait EventDataLookup {
    /// Returns `None` when the document or pickle for `case` was never seen.
    fn case_data(&self, case: &TestCaseRef) -> Option<CaseData<'_>>;
}

#[derive(Debug, Default)]
struct CaseRecord {
    steps: Vec<TestStep>,
    result: Option<TestResult>,
}

/// In-memory [`EventDataLookup`] built from the event stream
#[derive(Debug, Default)]
pub struct EventDataCollector {
    documents: HashMap<String, Document>,
    pickles: HashMap<SourceLocation, Pickle>,
    /// Steps announced by `test-case-prepared`, before an attempt exists
    prepared: HashMap<SourceLocation, Vec<PreparedStep>>,
    cases: HashMap<TestCaseRef, CaseRecord>,
}

impl EventDataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the data carried by `event`. Must run before the translator
    /// sees the same event.
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::GherkinDocument { uri, document } => {
                let mut document = document.clone();
                document.uri = uri.clone();
                self.documents.insert(uri.clone(), document);
            }
            Event::Pickle { uri, pickle } | Event::PickleAccepted { uri, pickle } => {
                // Test cases are keyed by the pickle's first location
                let Some(loc) = pickle.locations.first() else {
                    tracing::warn!(uri = %uri, name = %pickle.name, "pickle without location ignored");
                    return;
                };
                self.pickles.insert(SourceLocation::new(uri.clone(), loc.line), pickle.clone());
            }
            Event::TestCasePrepared { source_location, steps } => {
                self.prepared.insert(source_location.clone(), steps.clone());
            }
            Event::TestCaseStarted(case) => {
                let steps = self
                    .prepared
                    .get(&case.source_location)
                    .map(|steps| {
                        steps
                            .iter()
                            .map(|s| TestStep {
                                source_line: s.source_location.as_ref().map(|l| l.line),
                                result: None,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                self.cases.insert(case.clone(), CaseRecord { steps, result: None });
            }
            Event::TestStepFinished { index, test_case, result } => {
                let record = self.cases.entry(test_case.clone()).or_default();
                if *index >= record.steps.len() {
                    record.steps.resize_with(*index + 1, TestStep::default);
                }
                record.steps[*index].result = Some(result.clone());
            }
            Event::TestCaseFinished { attempt_number, source_location, result } => {
                let case = TestCaseRef {
                    attempt_number: *attempt_number,
                    source_location: source_location.clone(),
                };
                self.cases.entry(case).or_default().result = Some(result.clone());
            }
            Event::Other => {}
        }
    }

    /// Number of documents seen so far
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl EventDataLookup for EventDataCollector {
    fn case_data(&self, case: &TestCaseRef) -> Option<CaseData<'_>> {
        let loc = &case.source_location;
        let document = self.documents.get(&loc.uri)?;
        let pickle = self.pickles.get(loc)?;
        let record = self.cases.get(case);
        Some(CaseData {
            document,
            pickle,
            result: record.and_then(|r| r.result.as_ref()),
            steps: record.map(|r| r.steps.as_slice()).unwrap_or_default(),
        })
    }
}
