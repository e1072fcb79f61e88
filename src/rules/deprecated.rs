//! Markup left over from retired templates

use super::helpers::{has_class, has_id, is_tag, parent_element};
use super::{messages, Rule, RuleContext};
use crate::diagnostics::ErrorSink;

/// Classes and ids from the old templates
pub struct DeprecatedNames;

impl Rule for DeprecatedNames {
    fn id(&self) -> &'static str {
        "deprecated-class-id"
    }

    fn description(&self) -> &'static str {
        "Elements must not use deprecated template classes or ids"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let names = &ctx.config.deprecated_names;

        for element in ctx.document.elements() {
            for name in names {
                if has_class(element, name) {
                    sink.at_node(self.id(), messages::deprecated_class(name), element);
                }
                if has_id(element, name) {
                    sink.at_node(self.id(), messages::deprecated_id(name), element);
                }
            }
        }
    }
}

/// Scripts belong in `<head>`
pub struct ScriptPlacement;

impl Rule for ScriptPlacement {
    fn id(&self) -> &'static str {
        "script-placement"
    }

    fn description(&self) -> &'static str {
        "<script> elements must be placed inside <head>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for script in ctx.document.elements_named("script") {
            let in_head = parent_element(script).is_some_and(|p| is_tag(p, "head"));
            if !in_head {
                sink.at_node(self.id(), messages::SCRIPT_OUTSIDE_HEAD, script);
            }
        }
    }
}
