//! Heading outline, tables and the page title

use super::helpers::{attr, descendant_elements, has_class, heading_level, is_tag, text_content};
use super::{messages, Rule, RuleContext};
use crate::diagnostics::ErrorSink;
use scraper::ElementRef;

fn headings<'a>(ctx: &RuleContext<'a>) -> Vec<(ElementRef<'a>, u8)> {
    ctx.document
        .elements()
        .filter_map(|e| heading_level(e).map(|level| (e, level)))
        .collect()
}

/// The page outline must start with a single `<h1>`
pub struct HeadingOutline;

impl Rule for HeadingOutline {
    fn id(&self) -> &'static str {
        "heading-outline"
    }

    fn description(&self) -> &'static str {
        "Page must have headings, including an <h1>, and the first heading must be the <h1>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let headings = headings(ctx);

        let Some(&(first, first_level)) = headings.first() else {
            match ctx.document.first_body_content() {
                Some(anchor) => sink.at_node(self.id(), messages::NO_HEADINGS, anchor),
                None => sink.message(self.id(), messages::NO_HEADINGS),
            }
            return;
        };

        let has_h1 = headings.iter().any(|&(_, level)| level == 1);
        if !has_h1 {
            sink.at_node(self.id(), messages::NO_H1, first);
        } else if first_level != 1 {
            sink.at_node(self.id(), messages::FIRST_HEADING_NOT_H1, first);
        }
    }
}

/// One `<h1>` per page, and no skipped levels going down the outline
pub struct HeadingStructure;

impl Rule for HeadingStructure {
    fn id(&self) -> &'static str {
        "heading-structure"
    }

    fn description(&self) -> &'static str {
        "Only one <h1> per page, and heading levels must not skip (e.g. <h2> then <h4>)"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let mut seen_h1 = false;
        let mut previous = 0u8;

        for (heading, level) in headings(ctx) {
            if level == 1 {
                if seen_h1 {
                    sink.at_node(self.id(), messages::MULTIPLE_H1, heading);
                }
                seen_h1 = true;
            }

            if previous != 0 && level > previous + 1 {
                sink.at_node(self.id(), messages::heading_skip(level, previous), heading);
            }
            previous = level;
        }
    }
}

/// Tables need a layout class and a header row with column scopes
pub struct TableStructure;

impl TableStructure {
    fn missing_structure(table: ElementRef<'_>, vertical: bool) -> Option<&'static str> {
        let Some(thead) = descendant_elements(table).find(|e| is_tag(*e, "thead")) else {
            return (!vertical).then_some(messages::TABLE_MISSING_THEAD);
        };
        let Some(row) = descendant_elements(thead).find(|e| is_tag(*e, "tr")) else {
            return Some(messages::TABLE_MISSING_TR);
        };

        let has_col_scope = descendant_elements(row).any(|cell| {
            is_tag(cell, "th") && attr(cell, "scope").is_some_and(|s| s.trim().eq_ignore_ascii_case("col"))
        });
        (!has_col_scope).then_some(messages::TABLE_MISSING_SCOPE)
    }
}

impl Rule for TableStructure {
    fn id(&self) -> &'static str {
        "table-structure"
    }

    fn description(&self) -> &'static str {
        "Tables need .display-lg or a vertical-table class, and <thead><tr><th scope='col'> unless vertical"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let config = ctx.config;

        for table in ctx.document.elements_named("table") {
            let vertical = table
                .value()
                .classes()
                .any(|c| config.is_vertical_table_class(c));

            if !vertical && !has_class(table, &config.display_lg_class) {
                sink.at_node(self.id(), messages::table_missing_class(&config.display_lg_class), table);
            }

            if let Some(message) = Self::missing_structure(table, vertical) {
                sink.at_node(self.id(), message, table);
            }
        }
    }
}

/// `<title>` must exist and read the same as the `<h1>`
pub struct TitleMatchesH1;

impl Rule for TitleMatchesH1 {
    fn id(&self) -> &'static str {
        "title-h1-match"
    }

    fn description(&self) -> &'static str {
        "Page must have a <title> whose text matches the <h1>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let document = ctx.document;

        let Some(title) = document.first("title") else {
            match document.head() {
                Some(head) => sink.at_node(self.id(), messages::MISSING_TITLE, head),
                None => sink.message(self.id(), messages::MISSING_TITLE),
            }
            return;
        };
        let Some(h1) = document.first("h1") else {
            return;
        };

        let title_text = text_content(title);
        let h1_text = text_content(h1);
        let (title_text, h1_text) = (title_text.trim(), h1_text.trim());
        if title_text != h1_text {
            sink.at_node(self.id(), messages::title_h1_mismatch(title_text, h1_text), h1);
        }
    }
}
