//! Document-level and `<head>` checks

use super::helpers::{attr, has_attr};
use super::{messages, Rule, RuleContext};
use crate::diagnostics::ErrorSink;

const DOCTYPE_PREFIX: &str = "<!doctype html>";

/// The page must open with `<!DOCTYPE html>`
pub struct Doctype;

impl Rule for Doctype {
    fn id(&self) -> &'static str {
        "doctype"
    }

    fn description(&self) -> &'static str {
        "Page must start with <!DOCTYPE html>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let start = ctx.document.source.trim_start();
        let has_doctype = start
            .get(..DOCTYPE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE_PREFIX));

        if !has_doctype {
            sink.at_line(self.id(), messages::MISSING_DOCTYPE, 1);
        }
    }
}

/// `<html>` must declare `lang="en"`
pub struct HtmlLang;

impl Rule for HtmlLang {
    fn id(&self) -> &'static str {
        "html-lang"
    }

    fn description(&self) -> &'static str {
        "The <html> element must have lang='en'"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let html = ctx.document.html_element();
        if attr(html, "lang") == Some("en") {
            return;
        }

        match ctx.document.first_body_content() {
            Some(anchor) => sink.at_node(self.id(), messages::MISSING_LANG, anchor),
            None => sink.at_line(self.id(), messages::MISSING_LANG, 1),
        }
    }
}

/// The legacy deferred jQuery CDN script must be removed
pub struct DeprecatedScript;

impl Rule for DeprecatedScript {
    fn id(&self) -> &'static str {
        "deprecated-jquery"
    }

    fn description(&self) -> &'static str {
        "Page loads the deprecated deferred jQuery CDN script"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let src = ctx.config.jquery_script_src.as_str();
        for script in ctx.document.elements_named("script") {
            if attr(script, "src") == Some(src) && has_attr(script, "defer") {
                sink.at_node(self.id(), messages::DEPRECATED_JQUERY, script);
            }
        }
    }
}
