//! Failure detail rendering
//!
//! A failed or ambiguous case is reported with a numbered, multi-line issue
//! summary:
//!
//! ```text
//! 1) Scenario: my scenario # a.feature:4
//!    ✔ Given a passing step
//!    ✖ When it breaks
//!        Error: something bad
//!    - Then nothing else runs
//! ```
//!
//! The text is escaped by the message layer, so renderers emit it raw.

use colored::Colorize;

use crate::collector::{CaseData, TestStep};
use crate::outcome::Status;

/// Options passed into every render call
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Wrap symbols and step lines in ANSI colors
    pub colors: bool,
}

/// Renders the details of a failed case
pub trait FailureRenderer {
    /// Render issue number `number` for `case`
    fn render(&self, number: usize, case: &CaseData<'_>, opts: &RenderOptions) -> String;
}

/// Cucumber-style issue summary
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueRenderer;

impl FailureRenderer for IssueRenderer {
    fn render(&self, number: usize, case: &CaseData<'_>, opts: &RenderOptions) -> String {
        let prefix = format!("{}) ", number);
        let indent = " ".repeat(prefix.len());
        let error_indent = " ".repeat(prefix.len() + 4);

        let location = format!("# {}:{}", case.document.uri, scenario_line(case));
        let mut lines = vec![format!(
            "{}Scenario: {} {}",
            prefix,
            case.name(),
            paint(&location, Paint::Comment, opts),
        )];

        let mut shown_error = false;
        let mut seen_located_step = false;
        for step in case.steps {
            let label = match step.source_line {
                Some(line) => {
                    seen_located_step = true;
                    step_label(case, line)
                }
                None => {
                    // Hooks only show up when something went wrong with them
                    if matches!(step.result.as_ref().map(|r| &r.status), None | Some(Status::Passed)) {
                        continue;
                    }
                    if seen_located_step { "After".to_string() } else { "Before".to_string() }
                }
            };

            let status = step_status(step);
            let text = format!("{} {}", symbol(&status), label);
            lines.push(format!("{}{}", indent, paint(&text, paint_for(&status), opts)));

            if let Some(exception) = step.result.as_ref().and_then(|r| r.exception.as_ref()) {
                push_indented(&mut lines, &error_indent, exception.text(), opts);
                shown_error = true;
            }
        }

        if !shown_error {
            if let Some(exception) = case.result.and_then(|r| r.exception.as_ref()) {
                push_indented(&mut lines, &error_indent, exception.text(), opts);
            }
        }

        lines.join("\n")
    }
}

fn scenario_line(case: &CaseData<'_>) -> u32 {
    case.pickle.locations.first().map_or(0, |l| l.line)
}

/// `<keyword><text>` for the step at `line`, taking the keyword from the
/// document and the (outline-substituted) text from the pickle.
fn step_label(case: &CaseData<'_>, line: u32) -> String {
    let pickle_step = case
        .pickle
        .steps
        .iter()
        .find(|s| s.locations.iter().any(|l| l.line == line));

    let keyword = pickle_step
        .into_iter()
        .flat_map(|s| s.locations.iter().map(|l| l.line))
        .chain(std::iter::once(line))
        .find_map(|l| case.document.step_at(l))
        .map_or("", |s| s.keyword.as_str());

    let text = match pickle_step {
        Some(s) => s.text.as_str(),
        None => case.document.step_at(line).map_or("", |s| s.text.as_str()),
    };
    format!("{}{}", keyword, text)
}

/// A step that never reported a result was skipped
fn step_status(step: &TestStep) -> Status {
    step.result.as_ref().map_or(Status::Skipped, |r| r.status.clone())
}

fn symbol(status: &Status) -> &'static str {
    match status {
        Status::Passed => "✔",
        Status::Failed | Status::Ambiguous => "✖",
        Status::Skipped => "-",
        Status::Pending | Status::Undefined | Status::Unknown(_) => "?",
    }
}

fn push_indented(lines: &mut Vec<String>, indent: &str, text: &str, opts: &RenderOptions) {
    for line in text.lines() {
        lines.push(format!("{}{}", indent, paint(line, Paint::Error, opts)));
    }
}

#[derive(Clone, Copy)]
enum Paint {
    Plain,
    Passed,
    Error,
    Skipped,
    Pending,
    Comment,
}

fn paint_for(status: &Status) -> Paint {
    match status {
        Status::Passed => Paint::Passed,
        Status::Failed | Status::Ambiguous => Paint::Error,
        Status::Skipped => Paint::Skipped,
        Status::Pending | Status::Undefined => Paint::Pending,
        Status::Unknown(_) => Paint::Plain,
    }
}

fn paint(text: &str, paint: Paint, opts: &RenderOptions) -> String {
    if !opts.colors {
        return text.to_string();
    }
    match paint {
        Paint::Plain => text.to_string(),
        Paint::Passed => text.green().to_string(),
        Paint::Error => text.red().to_string(),
        Paint::Skipped => text.cyan().to_string(),
        Paint::Pending => text.yellow().to_string(),
        Paint::Comment => text.bright_black().to_string(),
    }
}
