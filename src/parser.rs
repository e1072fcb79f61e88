//! HTML document loader - decodes raw bytes and parses them into a lintable DOM

use crate::location::{self, LocationTable};
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("Content is not valid {encoding}: {reason}")]
    Decode {
        encoding: &'static str,
        reason: String,
    },
}

/// Text encodings the loader recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    /// Sniff the encoding from a byte-order mark, returning it with the BOM length
    pub fn sniff(bytes: &[u8]) -> (Self, usize) {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
            [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
            _ => (Encoding::Utf8, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        }
    }
}

/// Decoded file text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Text without the byte-order mark
    pub text: String,
    /// Invalid UTF-8 sequences were replaced with U+FFFD
    pub replaced: bool,
}

/// Decode raw file bytes to text, stripping any byte-order mark.
///
/// UTF-8 is decoded lossily so a stray legacy byte never hides a page from the linter.
/// UTF-16 that cannot be decoded is an error.
pub fn decode(bytes: &[u8]) -> Result<Decoded, LoadError> {
    let (encoding, bom_len) = Encoding::sniff(bytes);
    let body = &bytes[bom_len..];

    let decode_error = |reason: String| LoadError::Decode {
        encoding: encoding.as_str(),
        reason,
    };

    match encoding {
        Encoding::Utf8 => {
            let text = String::from_utf8_lossy(body);
            let replaced = matches!(text, Cow::Owned(_));
            Ok(Decoded {
                text: text.into_owned(),
                replaced,
            })
        }
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(decode_error("odd number of bytes".to_string()));
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| match encoding {
                    Encoding::Utf16Le => u16::from_le_bytes([pair[0], pair[1]]),
                    _ => u16::from_be_bytes([pair[0], pair[1]]),
                })
                .collect();
            String::from_utf16(&units)
                .map(|text| Decoded {
                    text,
                    replaced: false,
                })
                .map_err(|e| decode_error(e.to_string()))
        }
    }
}

/// A parsed HTML page with its source and location table
#[derive(Debug)]
pub struct HtmlDocument {
    /// Decoded source text, without BOM
    pub source: String,
    /// Parse tree
    pub html: Html,
    locations: LocationTable,
}

impl HtmlDocument {
    /// Load and parse a file from disk
    pub fn parse_file(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path)?;
        let decoded = decode(&bytes)?;
        if decoded.replaced {
            log::warn!("{}: invalid UTF-8 bytes replaced with U+FFFD", path.display());
        }
        Ok(Self::parse_str(&decoded.text))
    }

    /// Decode and parse raw bytes
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let decoded = decode(bytes)?;
        if decoded.replaced {
            log::warn!("Invalid UTF-8 bytes replaced with U+FFFD");
        }
        Ok(Self::parse_str(&decoded.text))
    }

    /// Parse already-decoded text. HTML parsing is tolerant and never fails.
    pub fn parse_str(source: &str) -> Self {
        let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
        let (html, locations) = location::parse_with_lines(source);
        Self {
            source: source.to_string(),
            html,
            locations,
        }
    }

    /// Source line of an element's start tag
    pub fn line_of(&self, id: NodeId) -> Option<usize> {
        self.locations.line_of(id)
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// All elements with the given tag name, in document order
    pub fn elements_named<'a>(&'a self, name: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let name = name.to_ascii_lowercase();
        self.elements()
            .filter(move |e| e.value().name().eq_ignore_ascii_case(&name))
    }

    /// First element with the given tag name
    pub fn first(&self, name: &str) -> Option<ElementRef<'_>> {
        self.elements_named(name).next()
    }

    /// The `<html>` element
    pub fn html_element(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The `<body>` element, if the parser produced one
    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.first("body")
    }

    /// The `<head>` element, if the parser produced one
    pub fn head(&self) -> Option<ElementRef<'_>> {
        self.first("head")
    }

    /// First child element of `<body>`, falling back to `<body>` itself
    pub fn first_body_content(&self) -> Option<ElementRef<'_>> {
        let body = self.body()?;
        body.children().find_map(ElementRef::wrap).or(Some(body))
    }
}
