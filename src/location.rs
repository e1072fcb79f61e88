//! Source location tracking for parsed HTML
//!
//! `scraper` does not keep source positions, so the document is built through a sink that
//! wraps scraper's own tree builder and records the tokenizer's current line as each element
//! is created. Elements the parser moves keep the line of their own start tag; elements it
//! invents (implied `<body>`, `<tbody>`, a `<p>` for a stray `</p>`) take the line of the
//! token that caused them.

use ego_tree::NodeId;
use html5ever::interface::{
    Attribute, ElementFlags, ExpandedName, NodeOrText, QualName, QuirksMode, TreeSink,
};
use html5ever::tendril::{StrTendril, TendrilSink};
use scraper::Html;
use std::borrow::Cow;
use std::collections::HashMap;

/// Maps element nodes of one parsed document to 1-based source lines
#[derive(Debug, Default)]
pub struct LocationTable {
    lines: HashMap<NodeId, usize>,
}

impl LocationTable {
    /// Line of the start tag that produced this node
    pub fn line_of(&self, id: NodeId) -> Option<usize> {
        self.lines.get(&id).copied()
    }

    /// Number of elements with a known location
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse a document, recording the source line of every element as it is created
pub fn parse_with_lines(source: &str) -> (Html, LocationTable) {
    let sink = LineTrackingSink {
        html: Html::new_document(),
        current_line: 1,
        lines: HashMap::new(),
    };
    html5ever::parse_document(sink, Default::default()).one(source)
}

/// Tree sink that forwards to scraper's `Html` and notes element lines
struct LineTrackingSink {
    html: Html,
    current_line: u64,
    lines: HashMap<NodeId, usize>,
}

impl TreeSink for LineTrackingSink {
    type Handle = NodeId;
    type Output = (Html, LocationTable);

    fn finish(self) -> Self::Output {
        let table = LocationTable { lines: self.lines };
        (self.html.finish(), table)
    }

    fn set_current_line(&mut self, line_number: u64) {
        self.current_line = line_number;
    }

    fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> NodeId {
        let id = self.html.create_element(name, attrs, flags);
        self.lines.insert(id, self.current_line as usize);
        id
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        self.html.parse_error(msg);
    }

    fn get_document(&mut self) -> NodeId {
        self.html.get_document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        self.html.elem_name(target)
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.html.create_comment(text)
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> NodeId {
        self.html.create_pi(target, data)
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        self.html.append(parent, child);
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        self.html.append_based_on_parent_node(element, prev_element, child);
    }

    fn append_doctype_to_document(&mut self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        self.html.append_doctype_to_document(name, public_id, system_id);
    }

    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        self.html.get_template_contents(target)
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        self.html.same_node(x, y)
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.html.set_quirks_mode(mode);
    }

    fn append_before_sibling(&mut self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        self.html.append_before_sibling(sibling, new_node);
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<Attribute>) {
        self.html.add_attrs_if_missing(target, attrs);
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.html.remove_from_parent(target);
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        self.html.reparent_children(node, new_parent);
    }
}
