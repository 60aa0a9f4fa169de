//! Deferred decoding of captured elements into caller-chosen types.

use super::Element;
use crate::error::{ParseError, Result};
use crate::token::{Attr, Name};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::de::DeserializeOwned;

impl Element {
    /// Rebuilds the element as a standalone XML document.
    ///
    /// The start tag is written from `name` and `attrs`, followed by
    /// `inner_xml` and the end tag. `chardata` is written (escaped) only when
    /// `inner_xml` is empty: a text-only element carries the same text in
    /// both fields and replaying both would double it.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Decodes the element into `T` without touching the source document.
    ///
    /// The destination follows `quick_xml::de` conventions: attributes map to
    /// `@name` fields, child elements to fields of the same name and text to
    /// `$text`.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        let xml = self.to_xml()?;
        quick_xml::de::from_str(&xml)
            .map_err(|e| ParseError::from(e).with_context(format!("decoding <{}>", self.name)))
    }

    pub(crate) fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        write_start(writer, &self.name, &self.attrs)?;

        if !self.inner_xml.is_empty() {
            writer.get_mut().extend_from_slice(self.inner_xml.as_bytes());
        } else if !self.chardata.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.chardata)))
                .map_err(ParseError::encode)?;
        }

        write_end(writer, &self.name)
    }
}

pub(crate) fn write_start(writer: &mut Writer<Vec<u8>>, name: &Name, attrs: &[Attr]) -> Result<()> {
    let qualified = name.qualified();
    let mut start = BytesStart::new(qualified.as_ref());
    for attr in attrs {
        let key = attr.name.qualified();
        start.push_attribute((key.as_ref(), attr.value.as_str()));
    }
    writer
        .write_event(Event::Start(start))
        .map_err(ParseError::encode)
}

pub(crate) fn write_end(writer: &mut Writer<Vec<u8>>, name: &Name) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name.qualified())))
        .map_err(ParseError::encode)
}
