//! Lint rules for course pages
//!
//! Every rule inspects one structural concern of a parsed page and appends findings to
//! the file's [`ErrorSink`]. Rules hold no per-document state and never depend on each
//! other having run; the engine decides which ones run and in what order.

pub mod deprecated;
pub mod head;
pub mod helpers;
pub mod media;
pub mod messages;
pub mod structure;
pub mod text;

use crate::config::RuleConfig;
use crate::diagnostics::ErrorSink;
use crate::parser::HtmlDocument;

/// Everything a rule may read while checking one file
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The parsed page
    pub document: &'a HtmlDocument,
    /// Path of the page relative to the scan root
    pub file_path: &'a str,
    /// Rule data table
    pub config: &'a RuleConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(document: &'a HtmlDocument, file_path: &'a str, config: &'a RuleConfig) -> Self {
        Self {
            document,
            file_path,
            config,
        }
    }
}

/// A single lint check
pub trait Rule: Send + Sync {
    /// Stable kebab-case identifier, used in config files and output
    fn id(&self) -> &'static str;

    /// One-line description for `--list-rules`
    fn description(&self) -> &'static str;

    /// Inspect the page and record findings
    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink);
}

/// Rules for regular pages, in execution order
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        // head
        Box::new(head::Doctype),
        Box::new(head::HtmlLang),
        Box::new(head::DeprecatedScript),
        // headings and page header
        Box::new(text::HeadingOutline),
        Box::new(text::HeadingStructure),
        Box::new(structure::HeaderPresence),
        // layout
        Box::new(structure::ContentWrapper),
        Box::new(structure::ContentBodyNesting),
        Box::new(structure::ContentBodyPlacement),
        // deprecated markup
        Box::new(deprecated::DeprecatedNames),
        Box::new(deprecated::ScriptPlacement),
        // embedded media
        Box::new(media::H5pWrapper),
        Box::new(media::IframeWrapper),
        Box::new(media::PanoptoContainer),
        Box::new(media::IframeTitle),
        // tables, title, images
        Box::new(text::TableStructure),
        Box::new(text::TitleMatchesH1),
        Box::new(media::ImageAlt),
        Box::new(media::ImageAttributes),
        Box::new(media::ImageInParagraph),
    ]
}

/// Rules for pages whose body holds nothing but iframes
pub fn iframe_only_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(media::IframeTitle)]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::aggregator;
    use crate::diagnostics::Diagnostic;

    /// Run one rule over a page with the default rule table
    pub fn run_rule(rule: &dyn Rule, html: &str) -> Vec<Diagnostic> {
        run_rule_at(rule, html, "course/page.html")
    }

    pub fn run_rule_at(rule: &dyn Rule, html: &str, path: &str) -> Vec<Diagnostic> {
        run_rule_with(rule, html, path, &RuleConfig::default())
    }

    pub fn run_rule_with(rule: &dyn Rule, html: &str, path: &str, config: &RuleConfig) -> Vec<Diagnostic> {
        let document = HtmlDocument::parse_str(html);
        let ctx = RuleContext::new(&document, path, config);
        let mut sink = ErrorSink::new();
        rule.check(&ctx, &mut sink);
        aggregator::resolve_all(sink, &document)
    }

    pub fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}
