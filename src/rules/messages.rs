//! Diagnostic message text. The report and the web UI match on these strings.

pub const MISSING_DOCTYPE: &str = "Missing <!DOCTYPE html>";
pub const MISSING_LANG: &str = "Missing <html lang='en'>";
pub const DEPRECATED_JQUERY: &str = "Head contains deprecated jquery script";

pub const MISSING_HEADER: &str = "Missing header class='header'";
pub const MISSING_CONTENT_WRAPPER: &str = "Missing #content-wrapper or #first-column";

pub fn nested_in_content_body(selector: &str) -> String {
    format!("An invalid '{selector}' is nested within a '.content-body'")
}

pub fn content_body_outside(parent_ids: &[String]) -> String {
    let ids: Vec<String> = parent_ids.iter().map(|id| format!("#{id}")).collect();
    format!("A '.content-body' is not inside {}", ids.join("/"))
}

pub fn deprecated_class(name: &str) -> String {
    format!("Contains deprecated class ({name})")
}

pub fn deprecated_id(name: &str) -> String {
    format!("Contains deprecated id ({name})")
}

pub const SCRIPT_OUTSIDE_HEAD: &str = "Invalid JS placement (script outside head section)";

pub const H5P_NOT_WRAPPED: &str =
    "Invalid iframes detected (h5p iframe not contained within its own 'div' tag)";
pub const MEDIA_NOT_WRAPPED: &str =
    "Invalid iframes detected (not contained within '.media-object' inside '.media-container')";
pub const IFRAME_NOT_WRAPPED: &str = "Invalid iframes detected (not contained within a wrapper 'div')";
pub const PANOPTO_NO_MEDIA_OBJECT: &str =
    "Invalid Panopto iframe (not contained within 'div.media-object')";
pub const PANOPTO_NO_MEDIA_CONTAINER: &str =
    "Invalid Panopto iframe ('div.media-object' not contained within 'div.media-container')";

pub fn iframe_title(fragment: &str) -> String {
    format!("Invalid iframes detected (incorrect title attribute: \"{fragment}\")")
}

pub const IMG_ALT_IN_HEADER: &str = "An <img> element inside a <header> is missing its alt attribute";
pub const IMG_ALT_IN_FIGURE: &str = "An <img> within a <figure> element is missing its alt attribute";
pub const IMG_ALT_MISSING: &str = "An <img> element is missing its alt attribute";

pub fn img_attribute(attribute: &str) -> String {
    format!("An <img> element contains the attribute: {attribute}")
}

pub const IMG_IN_PARAGRAPH: &str = "An <img> element is wrapped in a <p> tag";

pub fn table_missing_class(class: &str) -> String {
    format!("A table does not contain '.{class}'")
}

pub const TABLE_MISSING_THEAD: &str =
    "A table does not contain the correct structure (missing <thead>)";
pub const TABLE_MISSING_TR: &str =
    "A table does not contain the correct structure (missing <tr> within <thead>)";
pub const TABLE_MISSING_SCOPE: &str =
    "A table does not contain the correct structure (missing <th scope='col'> within <thead>)";

pub fn title_h1_mismatch(title: &str, h1: &str) -> String {
    format!("<title> and <h1> do not match (\"{title}\" vs \"{h1}\")")
}

pub const MISSING_TITLE: &str = "Missing <title> element";

pub const MULTIPLE_H1: &str = "Invalid heading structure (more than one <h1> heading found)";
pub const FIRST_HEADING_NOT_H1: &str = "Invalid heading structure (the first heading is not an <h1>)";
pub const NO_HEADINGS: &str = "Invalid heading structure (no headings found)";
pub const NO_H1: &str = "Invalid heading structure (no <h1> heading found)";

pub fn heading_skip(level: u8, previous: u8) -> String {
    format!("Invalid heading structure (<h{level}> found after <h{previous}>)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_messages() {
        assert_eq!(
            nested_in_content_body("header"),
            "An invalid 'header' is nested within a '.content-body'"
        );
        assert_eq!(
            content_body_outside(&["content-wrapper".to_string(), "first-column".to_string()]),
            "A '.content-body' is not inside #content-wrapper/#first-column"
        );
        assert_eq!(heading_skip(4, 2), "Invalid heading structure (<h4> found after <h2>)");
        assert_eq!(
            title_h1_mismatch("Foo", "Bar"),
            "<title> and <h1> do not match (\"Foo\" vs \"Bar\")"
        );
        assert_eq!(table_missing_class("display-lg"), "A table does not contain '.display-lg'");
    }
}
