//! Lint engine - picks the rule set for a page and runs it

use crate::aggregator;
use crate::config::{Config, RuleConfig};
use crate::diagnostics::{Diagnostic, ErrorSink, FileReport};
use crate::parser::{HtmlDocument, LoadError};
use crate::rules::helpers::{child_elements, is_tag};
use crate::rules::{iframe_only_rules, standard_rules, Rule, RuleContext};
use std::path::Path;

/// Which rule set a page gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShape {
    /// `<body>` holds nothing but iframes
    IframeOnly,
    Standard,
}

impl PageShape {
    /// Classify a parsed page.
    ///
    /// Text and comments between the iframes are ignored. An empty body counts as
    /// iframe-only, a page without any `<body>` (a frameset) is standard.
    pub fn classify(document: &HtmlDocument) -> Self {
        let Some(body) = document.body() else {
            return PageShape::Standard;
        };

        if child_elements(body).all(|child| is_tag(child, "iframe")) {
            PageShape::IframeOnly
        } else {
            PageShape::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageShape::IframeOnly => "iframe-only",
            PageShape::Standard => "standard",
        }
    }
}

/// The main lint engine
pub struct LintEngine {
    /// Enabled rules for standard pages, in execution order
    standard: Vec<Box<dyn Rule>>,
    /// Enabled rules for iframe-only pages
    iframe_only: Vec<Box<dyn Rule>>,
    /// Rule data table
    rule_config: RuleConfig,
}

impl LintEngine {
    /// Create a new lint engine with every enabled rule
    pub fn new(config: &Config) -> Self {
        let enabled = |rules: Vec<Box<dyn Rule>>| -> Vec<Box<dyn Rule>> {
            rules
                .into_iter()
                .filter(|rule| config.is_rule_enabled(rule.id()))
                .collect()
        };

        Self {
            standard: enabled(standard_rules()),
            iframe_only: enabled(iframe_only_rules()),
            rule_config: config.rules.clone(),
        }
    }

    /// Rules that run for a page shape
    pub fn rules_for(&self, shape: PageShape) -> &[Box<dyn Rule>] {
        match shape {
            PageShape::IframeOnly => &self.iframe_only,
            PageShape::Standard => &self.standard,
        }
    }

    /// Run the rules for the page's shape and collect raw findings
    pub fn check_document(&self, doc: &HtmlDocument, path: &str) -> ErrorSink {
        let shape = PageShape::classify(doc);
        log::debug!("{path}: {} page", shape.as_str());

        let ctx = RuleContext::new(doc, path, &self.rule_config);
        let mut sink = ErrorSink::new();
        for rule in self.rules_for(shape) {
            rule.check(&ctx, &mut sink);
        }
        sink
    }

    /// Lint a document and return line-resolved diagnostics
    pub fn lint_document(&self, doc: &HtmlDocument, path: &str) -> Vec<Diagnostic> {
        aggregator::resolve_all(self.check_document(doc, path), doc)
    }

    /// Lint a document into a file report
    pub fn report_document(&self, doc: &HtmlDocument, path: &str) -> FileReport {
        aggregator::file_report(path, self.check_document(doc, path), doc)
    }

    /// Load, lint and report one file; `relative` is the path shown in reports
    pub fn lint_file(&self, file: &Path, relative: &str) -> Result<FileReport, LoadError> {
        let doc = HtmlDocument::parse_file(file)?;
        Ok(self.report_document(&doc, relative))
    }

    /// Get count of enabled rules
    pub fn rule_count(&self) -> usize {
        self.standard.len()
    }
}
