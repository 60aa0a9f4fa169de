//! Generic element capture.
//!
//! An [`Element`] records enough of a subtree to rebuild it later: the start
//! tag exactly as it was read, the serialized inner markup, the element's own
//! text and its own comments. Typing the element is deferred to
//! [`Element::unmarshal`].

mod unmarshal;

pub(crate) use unmarshal::{write_end, write_start};

use crate::error::Result;
use crate::source::TokenSource;
use crate::token::{Attr, Name, StartTag};
use serde::Serialize;

/// Type-erased capture of one XML element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: Name,
    pub attrs: Vec<Attr>,
    /// Serialized markup between the start and end tag
    pub inner_xml: String,
    /// Unescaped text and CDATA that are direct children
    pub chardata: String,
    /// Text of comments that are direct children
    pub comment: String,
}

impl Element {
    /// Creates an element with no attributes and no content
    pub fn new(name: Name) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, local: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(Name::local(local), value));
        self
    }

    pub fn with_inner_xml(mut self, inner_xml: impl Into<String>) -> Self {
        self.inner_xml = inner_xml.into();
        self
    }

    pub fn with_chardata(mut self, chardata: impl Into<String>) -> Self {
        self.chardata = chardata.into();
        self
    }

    /// The start tag this element was opened with
    pub fn start_tag(&self) -> StartTag {
        StartTag {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
        }
    }

    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.local == local)
            .map(|attr| attr.value.as_str())
    }
}

/// Consumes the subtree opened by `start` and captures it.
///
/// Name and attributes come from `start` itself, not from the source's
/// decode step.
pub fn capture<S>(source: &mut S, start: &StartTag) -> Result<Element>
where
    S: TokenSource + ?Sized,
{
    let raw = source.decode_element(start)?;
    Ok(Element {
        name: start.name.clone(),
        attrs: start.attrs.clone(),
        inner_xml: raw.inner_xml,
        chardata: raw.chardata,
        comment: raw.comment,
    })
}
