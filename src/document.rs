//! Feature documents, pickles and boundary resolution
//!
//! Documents and pickles arrive already parsed, as payloads of the runner's
//! `gherkin-document` and `pickle` events. Nothing here parses Gherkin text.
//!
//! Suite boundaries are never announced by the runner. They are inferred by
//! locating a test case's source line among the document's runnable
//! positions: the first position opens the suite, the last one closes it.

use serde::Deserialize;

/// A `(uri, line)` pair tying a runtime event to a document element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct SourceLocation {
    pub uri: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(uri: impl Into<String>, line: u32) -> Self {
        Self { uri: uri.into(), line }
    }
}

/// A line/column position inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

/// A parsed feature file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Source uri; filled in from the enclosing event
    #[serde(default)]
    pub uri: String,
    /// Documents without a `Feature:` line have no feature
    #[serde(default)]
    pub feature: Option<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub children: Vec<Child>,
}

/// A top-level feature child: a scenario, an outline or a background
#[derive(Debug, Clone, Deserialize)]
pub struct Child {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub location: Location,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub examples: Vec<Examples>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub location: Location,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub text: String,
}

/// An outline's examples table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examples {
    #[serde(default)]
    pub table_body: Vec<TableRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    pub location: Location,
}

/// An executable scenario instance, after outline expansion
#[derive(Debug, Clone, Deserialize)]
pub struct Pickle {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub steps: Vec<PickleStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickleStep {
    pub text: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Where a test case sits among its document's runnable positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasePosition {
    pub index: usize,
    pub total: usize,
}

impl CasePosition {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

impl Child {
    /// Backgrounds never become test cases
    pub fn is_runnable(&self) -> bool {
        self.kind != "Background"
    }

    /// Source lines a test case of this child may report.
    ///
    /// A plain scenario reports its own line. An outline reports one line
    /// per example row, in declaration order.
    fn case_lines(&self) -> Vec<u32> {
        let rows: Vec<u32> = self
            .examples
            .iter()
            .flat_map(|ex| ex.table_body.iter().map(|row| row.location.line))
            .collect();
        if rows.is_empty() {
            vec![self.location.line]
        } else {
            rows
        }
    }
}

impl Document {
    /// Feature name, or empty for a feature-less document
    pub fn feature_name(&self) -> &str {
        self.feature.as_ref().map_or("", |f| f.name.as_str())
    }

    /// Top-level children, empty for a feature-less document
    pub fn children(&self) -> &[Child] {
        match self.feature {
            Some(ref f) => &f.children,
            None => &[],
        }
    }

    /// Find the document step declared at `line`, searching every child
    /// (backgrounds included).
    pub fn step_at(&self, line: u32) -> Option<&Step> {
        self.children()
            .iter()
            .flat_map(|c| c.steps.iter())
            .find(|s| s.location.line == line)
    }

    /// Declaration-ordered lines of every test case this document can produce
    fn case_lines(&self) -> Vec<u32> {
        self.children()
            .iter()
            .filter(|c| c.is_runnable())
            .flat_map(|c| c.case_lines())
            .collect()
    }
}

/// Locate `position` among the runnable positions of `document`.
///
/// Returns `None` when the uri differs or no position matches the line.
/// Callers treat that as "not a boundary".
pub fn resolve_position(document: &Document, position: &SourceLocation) -> Option<CasePosition> {
    if document.uri != position.uri {
        return None;
    }
    let lines = document.case_lines();
    let index = lines.iter().position(|&l| l == position.line)?;
    Some(CasePosition { index, total: lines.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(line: u32, name: &str) -> Child {
        Child {
            kind: "Scenario".into(),
            location: Location { line, column: 1 },
            keyword: "Scenario".into(),
            name: name.into(),
            steps: Vec::new(),
            examples: Vec::new(),
        }
    }

    fn doc(children: Vec<Child>) -> Document {
        Document {
            uri: "a.feature".into(),
            feature: Some(Feature {
                name: "my feature".into(),
                keyword: "Feature".into(),
                children,
            }),
        }
    }

    #[test]
    fn test_resolve_single_scenario_is_first_and_last() {
        let d = doc(vec![scenario(4, "only")]);
        let pos = resolve_position(&d, &SourceLocation::new("a.feature", 4)).unwrap();
        assert_eq!(pos, CasePosition { index: 0, total: 1 });
        assert!(pos.is_first());
        assert!(pos.is_last());
    }

    #[test]
    fn test_resolve_middle_scenario() {
        let d = doc(vec![scenario(4, "a"), scenario(8, "b"), scenario(12, "c")]);
        let pos = resolve_position(&d, &SourceLocation::new("a.feature", 8)).unwrap();
        assert_eq!(pos.index, 1);
        assert_eq!(pos.total, 3);
        assert!(!pos.is_first());
        assert!(!pos.is_last());

        let last = resolve_position(&d, &SourceLocation::new("a.feature", 12)).unwrap();
        assert!(last.is_last());
    }

    #[test]
    fn test_resolve_unknown_line() {
        let d = doc(vec![scenario(4, "a")]);
        assert!(resolve_position(&d, &SourceLocation::new("a.feature", 5)).is_none());
    }

    #[test]
    fn test_resolve_other_uri() {
        let d = doc(vec![scenario(4, "a")]);
        assert!(resolve_position(&d, &SourceLocation::new("b.feature", 4)).is_none());
    }

    #[test]
    fn test_resolve_featureless_document() {
        let d = Document { uri: "a.feature".into(), feature: None };
        assert!(resolve_position(&d, &SourceLocation::new("a.feature", 1)).is_none());
        assert_eq!(d.feature_name(), "");
    }

    #[test]
    fn test_background_is_not_a_position() {
        let mut bg = scenario(3, "");
        bg.kind = "Background".into();
        let d = doc(vec![bg, scenario(6, "a"), scenario(9, "b")]);
        let first = resolve_position(&d, &SourceLocation::new("a.feature", 6)).unwrap();
        assert!(first.is_first());
        assert_eq!(first.total, 2);
        assert!(resolve_position(&d, &SourceLocation::new("a.feature", 3)).is_none());
    }

    #[test]
    fn test_outline_rows_are_positions() {
        let mut outline = scenario(8, "outline");
        outline.kind = "ScenarioOutline".into();
        outline.examples = vec![Examples {
            table_body: vec![
                TableRow { location: Location { line: 12, column: 5 } },
                TableRow { location: Location { line: 13, column: 5 } },
            ],
        }];
        let d = doc(vec![scenario(4, "plain"), outline]);

        let row1 = resolve_position(&d, &SourceLocation::new("a.feature", 12)).unwrap();
        assert_eq!(row1, CasePosition { index: 1, total: 3 });
        assert!(!row1.is_last());

        let row2 = resolve_position(&d, &SourceLocation::new("a.feature", 13)).unwrap();
        assert!(row2.is_last());

        // The outline header itself never runs
        assert!(resolve_position(&d, &SourceLocation::new("a.feature", 8)).is_none());
    }

    #[test]
    fn test_boundaries_follow_declaration_order() {
        let d = doc(vec![scenario(4, "a"), scenario(8, "b")]);
        // Executing the last-declared case first still reports it as last.
        let pos = resolve_position(&d, &SourceLocation::new("a.feature", 8)).unwrap();
        assert!(pos.is_last());
        assert!(!pos.is_first());
    }

    #[test]
    fn test_step_at() {
        let mut s = scenario(4, "a");
        s.steps.push(Step {
            location: Location { line: 5, column: 3 },
            keyword: "Given ".into(),
            text: "a step".into(),
        });
        let d = doc(vec![s]);
        assert_eq!(d.step_at(5).unwrap().keyword, "Given ");
        assert!(d.step_at(6).is_none());
    }

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "type": "GherkinDocument",
            "feature": {
                "type": "Feature",
                "keyword": "Feature",
                "name": "my feature",
                "children": [
                    {
                        "type": "Scenario",
                        "location": {"line": 4, "column": 1},
                        "keyword": "Scenario",
                        "name": "my scenario",
                        "steps": [
                            {"type": "Step", "location": {"line": 6, "column": 1}, "keyword": "Given ", "text": "my step"}
                        ]
                    }
                ]
            },
            "comments": []
        }"#;
        let d: Document = serde_json::from_str(json).unwrap();
        assert_eq!(d.feature_name(), "my feature");
        assert_eq!(d.children().len(), 1);
        assert_eq!(d.children()[0].location.line, 4);
        assert_eq!(d.children()[0].steps[0].text, "my step");
    }
}
