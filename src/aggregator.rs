//! Error aggregation - turns raw rule findings into line-resolved diagnostics

use crate::diagnostics::{Anchor, Diagnostic, ErrorSink, FileReport, Finding};
use crate::location::LocationTable;
use crate::parser::HtmlDocument;
use ego_tree::NodeId;

/// Something that can map an element to its source line
pub trait LineLookup {
    fn line_of(&self, id: NodeId) -> Option<usize>;
}

impl LineLookup for LocationTable {
    fn line_of(&self, id: NodeId) -> Option<usize> {
        LocationTable::line_of(self, id)
    }
}

impl LineLookup for HtmlDocument {
    fn line_of(&self, id: NodeId) -> Option<usize> {
        HtmlDocument::line_of(self, id)
    }
}

/// Resolve a single finding
pub fn resolve(finding: Finding, lines: &impl LineLookup) -> Diagnostic {
    let line = match &finding.anchor {
        Anchor::None => None,
        Anchor::Line(line) => Some(*line),
        Anchor::Node(node) => {
            let line = lines.line_of(node.id);
            if line.is_none() {
                log::debug!(
                    "No source location for <{}> in finding \"{}\" ({})",
                    node.tag,
                    finding.message,
                    finding.rule_id
                );
            }
            line
        }
    };

    Diagnostic {
        rule: finding.rule_id,
        message: finding.message,
        line,
    }
}

/// Resolve every finding in a sink, keeping insertion order
pub fn resolve_all(sink: ErrorSink, lines: &impl LineLookup) -> Vec<Diagnostic> {
    sink.into_findings()
        .into_iter()
        .map(|finding| resolve(finding, lines))
        .collect()
}

/// Build the report for one file
pub fn file_report(path: impl Into<String>, sink: ErrorSink, lines: &impl LineLookup) -> FileReport {
    FileReport::new(path, resolve_all(sink, lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLines;

    impl LineLookup for NoLines {
        fn line_of(&self, _id: NodeId) -> Option<usize> {
            None
        }
    }

    #[test]
    fn test_resolves_all_three_shapes() {
        let doc = HtmlDocument::parse_str("<html>\n<body>\n<img src=a.png>\n</body></html>");
        let img = doc.first("img").unwrap();

        let mut sink = ErrorSink::new();
        sink.message("plain", "plain message");
        sink.at_line("line", "line message", 1);
        sink.at_node("node", "node message", img);

        let diagnostics = resolve_all(sink, &doc);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::new("plain", "plain message", None),
                Diagnostic::new("line", "line message", Some(1)),
                Diagnostic::new("node", "node message", Some(3)),
            ]
        );
    }

    #[test]
    fn test_unresolved_node_is_kept_with_null_line() {
        let doc = HtmlDocument::parse_str("<p>x</p>");
        let p = doc.first("p").unwrap();

        let mut sink = ErrorSink::new();
        sink.at_node("node", "kept", p);

        let diagnostics = resolve_all(sink, &NoLines);
        assert_eq!(diagnostics, vec![Diagnostic::new("node", "kept", None)]);
    }

    #[test]
    fn test_implied_body_resolves_to_triggering_line() {
        let doc = HtmlDocument::parse_str("\n<p>x</p>");
        let body = doc.body().unwrap();

        let mut sink = ErrorSink::new();
        sink.at_node("node", "at body", body);

        let report = file_report("page.html", sink, &doc);
        assert_eq!(report.path, "page.html");
        assert_eq!(report.diagnostics[0].line, Some(2));
    }
}
