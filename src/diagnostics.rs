//! Diagnostic types for lint results

use ego_tree::NodeId;
use serde::Serialize;

/// Reference to the element a finding is about.
///
/// Only the node id and tag are kept; the parse tree itself stays with the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAnchor {
    pub id: NodeId,
    pub tag: String,
}

/// Where a finding points in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// File-level finding with no stable source position
    None,
    /// Explicit 1-based line
    Line(usize),
    /// An element, resolved to a line by the aggregator
    Node(NodeAnchor),
}

/// A raw finding emitted by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Rule ID that produced this finding
    pub rule_id: &'static str,
    pub message: String,
    pub anchor: Anchor,
}

/// Append-only collection of findings for one file
#[derive(Debug, Default)]
pub struct ErrorSink {
    findings: Vec<Finding>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file-level finding
    pub fn message(&mut self, rule_id: &'static str, message: impl Into<String>) {
        self.push(rule_id, message, Anchor::None);
    }

    /// Record a finding at an explicit line
    pub fn at_line(&mut self, rule_id: &'static str, message: impl Into<String>, line: usize) {
        self.push(rule_id, message, Anchor::Line(line));
    }

    /// Record a finding about an element
    pub fn at_node(
        &mut self,
        rule_id: &'static str,
        message: impl Into<String>,
        element: scraper::ElementRef<'_>,
    ) {
        let anchor = NodeAnchor {
            id: element.id(),
            tag: element.value().name().to_string(),
        };
        self.push(rule_id, message, Anchor::Node(anchor));
    }

    fn push(&mut self, rule_id: &'static str, message: impl Into<String>, anchor: Anchor) {
        self.findings.push(Finding {
            rule_id,
            message: message.into(),
            anchor,
        });
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings in insertion order
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

/// A resolved lint diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule: &'static str,
    /// Human-readable message
    pub message: String,
    /// Source line (1-based), when one could be resolved
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(rule: &'static str, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            rule,
            message: message.into(),
            line,
        }
    }

    /// Report-line rendering: `message (line N)` or just `message`
    pub fn display_text(&self) -> String {
        match self.line {
            Some(line) => format!("{} (line {})", self.message, line),
            None => self.message.clone(),
        }
    }
}

/// Ordered diagnostics for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the scan root, with forward slashes
    pub path: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(path: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: path.into(),
            diagnostics,
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.diagnostics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_sink_keeps_insertion_order() {
        let mut sink = ErrorSink::new();
        sink.message("a", "first");
        sink.at_line("b", "second", 1);
        sink.message("c", "third");

        let messages: Vec<_> = sink.findings().iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_sink_node_anchor() {
        let html = Html::parse_document("<img src=x>");
        let img = html.select(&Selector::parse("img").unwrap()).next().unwrap();

        let mut sink = ErrorSink::new();
        sink.at_node("img", "no alt", img);

        match &sink.findings()[0].anchor {
            Anchor::Node(anchor) => {
                assert_eq!(anchor.tag, "img");
                assert_eq!(anchor.id, img.id());
            }
            other => panic!("unexpected anchor {other:?}"),
        }
    }

    #[test]
    fn test_empty_sink() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());
        assert!(sink.into_findings().is_empty());
    }

    #[test]
    fn test_diagnostic_display_text() {
        let with_line = Diagnostic::new("r", "Missing <!DOCTYPE html>", Some(1));
        assert_eq!(with_line.display_text(), "Missing <!DOCTYPE html> (line 1)");

        let without = Diagnostic::new("r", "Missing <title> element", None);
        assert_eq!(without.display_text(), "Missing <title> element");
    }

    #[test]
    fn test_diagnostic_serializes_null_line() {
        let diag = Diagnostic::new("doctype", "msg", None);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["line"], serde_json::Value::Null);
        assert_eq!(json["rule"], "doctype");
    }

    #[test]
    fn test_file_report_counts() {
        let report = FileReport::new("a.html", vec![Diagnostic::new("r", "m", None)]);
        assert!(report.has_issues());
        assert_eq!(report.issue_count(), 1);
        assert!(!FileReport::new("b.html", Vec::new()).has_issues());
    }
}
