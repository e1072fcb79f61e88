//! Embedded media checks: iframe wrappers and titles, image markup

use super::helpers::{
    attr, child_elements, descendant_elements, has_ancestor_tag, has_attr, has_class,
    is_div_with_class, is_sole_child, is_tag, parent_element,
};
use super::{messages, Rule, RuleContext};
use crate::config::RuleConfig;
use crate::diagnostics::ErrorSink;
use scraper::ElementRef;

/// How an iframe is classified by its `src` and `aria-label`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IframeKind {
    H5p,
    Panopto,
    Video,
    Other,
}

fn iframe_kind(iframe: ElementRef<'_>, config: &RuleConfig) -> IframeKind {
    let src = attr(iframe, "src").unwrap_or("");
    let aria = attr(iframe, "aria-label").unwrap_or("");

    if config.is_h5p_src(src) {
        IframeKind::H5p
    } else if config.is_panopto(src, aria) {
        IframeKind::Panopto
    } else if config.is_media_embed(src, aria) {
        IframeKind::Video
    } else {
        IframeKind::Other
    }
}

/// `div.media-object` directly inside `div.media-container`
fn media_object_of<'a>(iframe: ElementRef<'a>, config: &RuleConfig) -> Option<ElementRef<'a>> {
    parent_element(iframe).filter(|p| is_div_with_class(*p, &config.media_object_class))
}

fn in_media_container(iframe: ElementRef<'_>, config: &RuleConfig) -> bool {
    media_object_of(iframe, config)
        .and_then(parent_element)
        .is_some_and(|c| is_div_with_class(c, &config.media_container_class))
}

/// H5P iframes must be the only thing inside their own `div`
pub struct H5pWrapper;

impl Rule for H5pWrapper {
    fn id(&self) -> &'static str {
        "iframe-h5p-wrapper"
    }

    fn description(&self) -> &'static str {
        "An H5P iframe must be the sole child of a <div>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for iframe in ctx.document.elements_named("iframe") {
            if iframe_kind(iframe, ctx.config) != IframeKind::H5p {
                continue;
            }

            let in_div = parent_element(iframe).is_some_and(|p| is_tag(p, "div"));
            if !in_div || !is_sole_child(iframe) {
                sink.at_node(self.id(), messages::H5P_NOT_WRAPPED, iframe);
            }
        }
    }
}

/// Video iframes need the media wrappers; any other iframe needs a plain `div` wrapper
pub struct IframeWrapper;

impl Rule for IframeWrapper {
    fn id(&self) -> &'static str {
        "iframe-wrapper"
    }

    fn description(&self) -> &'static str {
        "Video iframes must be in div.media-object inside div.media-container; other iframes need a <div> wrapper"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for iframe in ctx.document.elements_named("iframe") {
            match iframe_kind(iframe, ctx.config) {
                IframeKind::H5p => {}
                IframeKind::Panopto | IframeKind::Video => {
                    if !in_media_container(iframe, ctx.config) {
                        sink.at_node(self.id(), messages::MEDIA_NOT_WRAPPED, iframe);
                    }
                }
                IframeKind::Other => {
                    let wrapped = parent_element(iframe)
                        .is_some_and(|p| is_tag(p, "div") && !has_class(p, &ctx.config.content_body_class));
                    if !wrapped {
                        sink.at_node(self.id(), messages::IFRAME_NOT_WRAPPED, iframe);
                    }
                }
            }
        }
    }
}

/// Panopto players get their own wrapper check with Panopto-specific messages.
///
/// This overlaps with [`IframeWrapper`]; a badly wrapped Panopto iframe is reported by both.
pub struct PanoptoContainer;

impl Rule for PanoptoContainer {
    fn id(&self) -> &'static str {
        "panopto-container"
    }

    fn description(&self) -> &'static str {
        "Panopto iframes must be in div.media-object inside div.media-container"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for iframe in ctx.document.elements_named("iframe") {
            if iframe_kind(iframe, ctx.config) != IframeKind::Panopto {
                continue;
            }

            if media_object_of(iframe, ctx.config).is_none() {
                sink.at_node(self.id(), messages::PANOPTO_NO_MEDIA_OBJECT, iframe);
            } else if !in_media_container(iframe, ctx.config) {
                sink.at_node(self.id(), messages::PANOPTO_NO_MEDIA_CONTAINER, iframe);
            }
        }
    }
}

/// Iframe titles must not be left as the embed-code default
pub struct IframeTitle;

impl IframeTitle {
    /// A `.media-info` next to the media object describes the video instead of the title
    fn has_media_info(iframe: ElementRef<'_>, config: &RuleConfig) -> bool {
        if !in_media_container(iframe, config) {
            return false;
        }
        media_object_of(iframe, config)
            .and_then(parent_element)
            .is_some_and(|container| {
                child_elements(container).any(|c| has_class(c, &config.media_info_class))
            })
    }
}

impl Rule for IframeTitle {
    fn id(&self) -> &'static str {
        "iframe-title"
    }

    fn description(&self) -> &'static str {
        "Iframe title must describe the content, not the embed-code default"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        let config = ctx.config;

        for iframe in ctx.document.elements_named("iframe") {
            if matches!(iframe_kind(iframe, config), IframeKind::H5p | IframeKind::Panopto) {
                continue;
            }
            let Some(title) = attr(iframe, "title").filter(|t| !t.is_empty()) else {
                continue;
            };
            if Self::has_media_info(iframe, config) {
                continue;
            }

            let src = attr(iframe, "src").unwrap_or("");
            if config.iframes_to_exclude.iter().any(|url| src.contains(url.as_str())) {
                continue;
            }

            for fragment in &config.titles_to_check {
                if title.contains(fragment.as_str()) {
                    sink.at_node(self.id(), messages::iframe_title(fragment), iframe);
                }
            }
        }
    }
}

/// Images need alt text
pub struct ImageAlt;

impl Rule for ImageAlt {
    fn id(&self) -> &'static str {
        "img-alt"
    }

    fn description(&self) -> &'static str {
        "<img> elements must have an alt attribute"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for img in ctx.document.elements_named("img") {
            if has_attr(img, "alt") {
                continue;
            }

            let message = if has_ancestor_tag(img, "header") {
                messages::IMG_ALT_IN_HEADER
            } else if parent_element(img).is_some_and(|p| {
                is_tag(p, "figure") && descendant_elements(p).any(|d| is_tag(d, "figcaption"))
            }) {
                messages::IMG_ALT_IN_FIGURE
            } else {
                messages::IMG_ALT_MISSING
            };
            sink.at_node(self.id(), message, img);
        }
    }
}

/// Sizing and loading attributes pasted in from other editors
pub struct ImageAttributes;

impl Rule for ImageAttributes {
    fn id(&self) -> &'static str {
        "img-unwanted-attributes"
    }

    fn description(&self) -> &'static str {
        "<img> elements must not carry sizing, loading or inline style attributes"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for img in ctx.document.elements_named("img") {
            for attribute in &ctx.config.image_attributes_to_remove {
                if has_attr(img, attribute) {
                    sink.at_node(self.id(), messages::img_attribute(attribute), img);
                }
            }
        }
    }
}

pub struct ImageInParagraph;

impl Rule for ImageInParagraph {
    fn id(&self) -> &'static str {
        "img-in-paragraph"
    }

    fn description(&self) -> &'static str {
        "<img> elements must not be wrapped in <p>"
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut ErrorSink) {
        for img in ctx.document.elements_named("img") {
            if parent_element(img).is_some_and(|p| is_tag(p, "p")) {
                sink.at_node(self.id(), messages::IMG_IN_PARAGRAPH, img);
            }
        }
    }
}
