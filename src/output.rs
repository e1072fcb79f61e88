//! Output formatters for scan results

use crate::diagnostics::Diagnostic;
use crate::scan::{FileFailure, ScanReport, ScanSummary};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

pub const REPORT_TITLE: &str = "Log Report for Course Review";
const SEPARATOR: &str = "--------------------------------------------------";
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render the plain-text report.
///
/// Files are numbered in walk order, counting only files that have diagnostics.
pub fn render_text(report: &ScanReport) -> String {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        report.generated_at.format(TIMESTAMP_FORMAT).to_string(),
        SEPARATOR.to_string(),
    ];

    for (index, file) in report.files_with_issues().enumerate() {
        lines.push(format!("{}. Errors in file \"{}\":", index + 1, file.path));
        lines.extend(file.diagnostics.iter().map(|d| format!(" > {}", d.display_text())));
        lines.push(SEPARATOR.to_string());
    }

    if report.summary.issues == 0 {
        lines.push(SEPARATOR.to_string());
        lines.push("No errors found.".to_string());
        lines.push(SEPARATOR.to_string());
    }

    for failure in &report.failures {
        lines.push(format!("Could not read \"{}\": {}", failure.path, failure.reason));
    }

    lines.join("\n")
}

/// Print the text report to stdout
pub fn print_text(report: &ScanReport) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", render_text(report));
}

/// JSON output format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    summary: &'a ScanSummary,
    by_file: BTreeMap<&'a str, Vec<JsonDiagnostic<'a>>>,
    failures: &'a [FileFailure],
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    rule: &'a str,
    message: &'a str,
    line: Option<usize>,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        Self {
            rule: d.rule,
            message: &d.message,
            line: d.line,
        }
    }
}

/// Format the scan result as pretty JSON: `{summary, byFile, failures}`
pub fn format_json(report: &ScanReport) -> serde_json::Result<String> {
    let by_file = report
        .by_file()
        .into_iter()
        .map(|(path, diagnostics)| (path, diagnostics.iter().map(JsonDiagnostic::from).collect()))
        .collect();

    let output = JsonOutput {
        summary: &report.summary,
        by_file,
        failures: &report.failures,
    };
    serde_json::to_string_pretty(&output)
}

/// Print the JSON result to stdout
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = format_json(report)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// One-line coloured summary
pub fn summary_line(summary: &ScanSummary) -> String {
    let scanned = plural(summary.files_scanned, "file");
    let mut line = if summary.issues == 0 {
        format!("{} in {scanned}", "No issues found".green().bold())
    } else {
        format!(
            "{} in {} ({scanned} scanned)",
            format!("Found {}", plural(summary.issues, "issue")).red().bold(),
            plural(summary.files_with_issues, "file"),
        )
    };

    if summary.parse_errors > 0 {
        let failed = format!("{} could not be read", plural(summary.parse_errors, "file"));
        line.push_str(&format!(", {}", failed.yellow()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FileReport;
    use pretty_assertions::assert_eq;

    fn sample_report() -> ScanReport {
        ScanReport::from_outcomes(vec![
            Ok(FileReport::new(
                "week1/a.html",
                vec![
                    Diagnostic::new("doctype", "Missing <!DOCTYPE html>", Some(1)),
                    Diagnostic::new("title-h1-match", "Missing <title> element", None),
                ],
            )),
            Ok(FileReport::new("week1/b.html", Vec::new())),
            Ok(FileReport::new(
                "week2/c.html",
                vec![Diagnostic::new("img-alt", "An <img> element is missing its alt attribute", Some(12))],
            )),
        ])
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_report());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], REPORT_TITLE);
        assert_eq!(lines[2], SEPARATOR);
        assert_eq!(
            lines[3..].to_vec(),
            vec![
                "1. Errors in file \"week1/a.html\":",
                " > Missing <!DOCTYPE html> (line 1)",
                " > Missing <title> element",
                SEPARATOR,
                "2. Errors in file \"week2/c.html\":",
                " > An <img> element is missing its alt attribute (line 12)",
                SEPARATOR,
            ]
        );
    }

    #[test]
    fn test_render_text_clean() {
        let report = ScanReport::from_outcomes(vec![Ok(FileReport::new("a.html", Vec::new()))]);
        let text = render_text(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3..].to_vec(), vec![SEPARATOR, "No errors found.", SEPARATOR]);
    }

    #[test]
    fn test_render_text_lists_failures() {
        let report = ScanReport::from_outcomes(vec![Err(FileFailure {
            path: "bad.html".into(),
            reason: "Content is not valid UTF-8".into(),
        })]);
        let text = render_text(&report);
        assert!(text.contains("No errors found."));
        assert!(text.ends_with("Could not read \"bad.html\": Content is not valid UTF-8"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["filesScanned"], 3);
        assert_eq!(value["summary"]["filesWithIssues"], 2);
        assert_eq!(value["summary"]["issues"], 3);
        assert_eq!(value["summary"]["parseErrors"], 0);

        let a = value["byFile"]["week1/a.html"].as_array().unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0]["message"], "Missing <!DOCTYPE html>");
        assert_eq!(a[0]["line"], 1);
        assert_eq!(a[0]["rule"], "doctype");
        assert!(a[1]["line"].is_null());

        assert!(value["byFile"].get("week1/b.html").is_none());
        assert_eq!(value["failures"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_format_json_clean() {
        let report = ScanReport::from_outcomes(Vec::new());
        let value: serde_json::Value = serde_json::from_str(&format_json(&report).unwrap()).unwrap();
        assert_eq!(value["summary"]["issues"], 0);
        assert_eq!(value["byFile"], serde_json::json!({}));
    }

    #[test]
    fn test_summary_line() {
        colored::control::set_override(false);

        let clean = ScanSummary {
            files_scanned: 1,
            ..Default::default()
        };
        assert_eq!(summary_line(&clean), "No issues found in 1 file");

        let dirty = ScanSummary {
            files_scanned: 3,
            files_with_issues: 2,
            issues: 4,
            parse_errors: 1,
        };
        assert_eq!(
            summary_line(&dirty),
            "Found 4 issues in 2 files (3 files scanned), 1 file could not be read"
        );
    }
}
