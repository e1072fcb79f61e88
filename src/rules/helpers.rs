//! DOM helpers shared by the rules

use scraper::ElementRef;

/// Tag name check, ignoring ASCII case
pub fn is_tag(element: ElementRef<'_>, name: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(name)
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn has_id(element: ElementRef<'_>, id: &str) -> bool {
    element.value().id() == Some(id)
}

pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

pub fn has_attr(element: ElementRef<'_>, name: &str) -> bool {
    element.value().attr(name).is_some()
}

/// `div` carrying the given class
pub fn is_div_with_class(element: ElementRef<'_>, class: &str) -> bool {
    is_tag(element, "div") && has_class(element, class)
}

/// Closest parent that is an element
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Element ancestors, nearest first
pub fn ancestor_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap)
}

/// Direct child elements
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Descendant elements in document order, excluding the element itself
pub fn descendant_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// True if any ancestor has the given tag
pub fn has_ancestor_tag(element: ElementRef<'_>, name: &str) -> bool {
    ancestor_elements(element).any(|a| is_tag(a, name))
}

/// Concatenated text content
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// True if the element is the only thing inside its parent.
///
/// Comments and whitespace-only text do not count as siblings.
pub fn is_sole_child(element: ElementRef<'_>) -> bool {
    let Some(parent) = element.parent() else {
        return false;
    };
    parent.children().all(|node| {
        if node.id() == element.id() {
            return true;
        }
        match node.value() {
            scraper::Node::Element(_) => false,
            scraper::Node::Text(text) => text.trim().is_empty(),
            _ => true,
        }
    })
}

/// Match a minimal selector: `.class`, `#id` or a bare tag name
pub fn matches_simple_selector(element: ElementRef<'_>, selector: &str) -> bool {
    if let Some(class) = selector.strip_prefix('.') {
        has_class(element, class)
    } else if let Some(id) = selector.strip_prefix('#') {
        has_id(element, id)
    } else {
        is_tag(element, selector)
    }
}

/// Heading level for `h1`..`h6`
pub fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    let name = element.value().name();
    let bytes = name.as_bytes();
    if bytes.len() == 2 && bytes[0].eq_ignore_ascii_case(&b'h') && (b'1'..=b'6').contains(&bytes[1]) {
        Some(bytes[1] - b'0')
    } else {
        None
    }
}
