//! Page layout checks: header, column wrappers and `.content-body` containers

use super::helpers::{
    ancestor_elements, descendant_elements, has_class, is_tag, matches_simple_selector,
};
use super::{messages, Rule, RuleContext};
use crate::config::RuleConfig;
use crate::diagnostics::ErrorSink;
use scraper::ElementRef;

fn content_bodies<'a>(ctx: &RuleContext<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let config: &'a RuleConfig = ctx.config;
    let class = config.content_body_class.as_str();
    ctx.document.elements().filter(move |e| has_class(*e, class))
}

/// Every non-syllabus page needs `<header class="header">`
pub struct HeaderPresence;

impl Rule for HeaderPresence {
    fn id(&self) -> &'static str {
        "header-presence"
    }

    fn description(&self) -> &'static str {
        "Page must contain <header class='header'> (syllabus pages are exempt)"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let marker = ctx.config.syllabus_marker.to_lowercase();
        if ctx.file_path.to_lowercase().contains(&marker) {
            return;
        }

        let has_header = ctx
            .document
            .elements_named("header")
            .any(|h| has_class(h, &ctx.config.header_class));
        if has_header {
            return;
        }

        match ctx.document.first_body_content() {
            Some(anchor) => sink.at_node(self.id(), messages::MISSING_HEADER, anchor),
            None => sink.message(self.id(), messages::MISSING_HEADER),
        }
    }
}

/// Page content must live in `div#content-wrapper` or `div#first-column`
pub struct ContentWrapper;

impl Rule for ContentWrapper {
    fn id(&self) -> &'static str {
        "content-wrapper"
    }

    fn description(&self) -> &'static str {
        "Page must contain div#content-wrapper or div#first-column"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let ids = &ctx.config.content_wrapper_ids;
        let found = ctx
            .document
            .elements_named("div")
            .any(|div| div.value().id().is_some_and(|id| ids.iter().any(|w| w == id)));

        if !found {
            sink.at_line(self.id(), messages::MISSING_CONTENT_WRAPPER, 1);
        }
    }
}

/// `.content-body` must not contain another `.content-body` or a `<header>`
pub struct ContentBodyNesting;

impl Rule for ContentBodyNesting {
    fn id(&self) -> &'static str {
        "content-body-nesting"
    }

    fn description(&self) -> &'static str {
        "A .content-body must not contain a nested .content-body or <header>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let forbidden = &ctx.config.content_body_forbidden_nested;

        for content_body in content_bodies(ctx) {
            for element in descendant_elements(content_body) {
                for selector in forbidden {
                    if matches_simple_selector(element, selector) {
                        sink.at_node(self.id(), messages::nested_in_content_body(selector), element);
                    }
                }
            }
        }
    }
}

/// `.content-body` must sit inside one of the column wrappers
pub struct ContentBodyPlacement;

impl Rule for ContentBodyPlacement {
    fn id(&self) -> &'static str {
        "content-body-placement"
    }

    fn description(&self) -> &'static str {
        "A .content-body must be inside #content-wrapper, #first-column, #second-column or #third-column"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let parents = &ctx.config.content_body_parents;

        for content_body in content_bodies(ctx) {
            let inside = ancestor_elements(content_body).any(|ancestor| {
                is_tag(ancestor, "div")
                    && ancestor
                        .value()
                        .id()
                        .is_some_and(|id| parents.iter().any(|p| p == id))
            });

            if !inside {
                sink.at_node(self.id(), messages::content_body_outside(parents), content_body);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{messages as msgs, run_rule, run_rule_at, run_rule_with};

    #[test]
    fn test_header_present() {
        let html = "<body><header class=\"header\"><h1>T</h1></header></body>";
        assert!(run_rule(&HeaderPresence, html).is_empty());
    }

    #[test]
    fn test_header_missing() {
        let html = "<body>\n<div id=\"content-wrapper\"></div>\n</body>";
        let diagnostics = run_rule(&HeaderPresence, html);
        assert_eq!(msgs(&diagnostics), vec![messages::MISSING_HEADER]);
        assert_eq!(diagnostics[0].line, Some(2));
    }

    #[test]
    fn test_header_without_class_is_missing() {
        let html = "<body><header><h1>T</h1></header></body>";
        assert_eq!(run_rule(&HeaderPresence, html).len(), 1);
    }

    #[test]
    fn test_syllabus_pages_exempt() {
        let html = "<body><p>x</p></body>";
        assert!(run_rule_at(&HeaderPresence, html, "course/Syllabus.html").is_empty());
        assert!(run_rule_at(&HeaderPresence, html, "SYLLABUS/week1.html").is_empty());
    }

    #[test]
    fn test_content_wrapper() {
        assert!(run_rule(&ContentWrapper, "<div id=\"content-wrapper\"></div>").is_empty());
        assert!(run_rule(&ContentWrapper, "<div id=\"first-column\"></div>").is_empty());

        let diagnostics = run_rule(&ContentWrapper, "<section id=\"content-wrapper\"></section>");
        assert_eq!(msgs(&diagnostics), vec![messages::MISSING_CONTENT_WRAPPER]);
        assert_eq!(diagnostics[0].line, Some(1));
    }

    #[test]
    fn test_content_wrapper_ids_come_from_config() {
        let config = RuleConfig {
            content_wrapper_ids: vec!["page-main".to_string()],
            ..RuleConfig::default()
        };
        let custom = "<div id=\"page-main\"></div>";
        assert!(run_rule_with(&ContentWrapper, custom, "page.html", &config).is_empty());
        assert_eq!(
            msgs(&run_rule_with(&ContentWrapper, "<div id=\"content-wrapper\"></div>", "page.html", &config)),
            vec![messages::MISSING_CONTENT_WRAPPER]
        );
    }

    #[test]
    fn test_nested_content_body_and_header() {
        let html = r#"<div id="content-wrapper">
<div class="content-body">
  <div class="content-body"></div>
  <header>x</header>
</div>
</div>"#;
        let diagnostics = run_rule(&ContentBodyNesting, html);
        assert_eq!(
            msgs(&diagnostics),
            vec![
                "An invalid '.content-body' is nested within a '.content-body'",
                "An invalid 'header' is nested within a '.content-body'",
            ]
        );
        assert_eq!(diagnostics[0].line, Some(3));
        assert_eq!(diagnostics[1].line, Some(4));
    }

    #[test]
    fn test_one_diagnostic_per_nested_element() {
        let html = r#"<div class="content-body"><header></header><p><header></header></p></div>"#;
        assert_eq!(run_rule(&ContentBodyNesting, html).len(), 2);
    }

    #[test]
    fn test_content_body_placement() {
        for parent in ["content-wrapper", "first-column", "second-column", "third-column"] {
            let html = format!(r#"<div id="{parent}"><section><div class="content-body"></div></section></div>"#);
            assert!(run_rule(&ContentBodyPlacement, &html).is_empty(), "parent {parent}");
        }
    }

    #[test]
    fn test_content_body_outside_wrapper() {
        let html = "<body>\n<div class=\"content-body\"></div>\n<section id=\"content-wrapper\"><div class=\"content-body\"></div></section></body>";
        let diagnostics = run_rule(&ContentBodyPlacement, html);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "A '.content-body' is not inside #content-wrapper/#first-column/#second-column/#third-column"
        );
        assert_eq!(diagnostics[0].line, Some(2));
        assert_eq!(diagnostics[1].line, Some(3));
    }
}
