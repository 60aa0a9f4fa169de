//! `quick-xml` backed token source.

use super::{Capture, TokenSource};
use crate::error::{ParseError, Result, SecurityError, SyntaxError};
use crate::token::{Attr, Name, StartTag, Token};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;
use tracing::trace;

pub const DEFAULT_MAX_DEPTH: usize = 1024;
pub const DEFAULT_MAX_ELEMENT_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Reader behaviour and limits for [`XmlTokenSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Trim leading and trailing whitespace from text and drop
    /// whitespace-only text between tags
    pub trim_text: bool,
    /// Maximum nesting depth, applied both to the elements open around the
    /// scan position and inside a single captured element
    pub max_depth: usize,
    /// Maximum size in bytes of a captured element's inner markup
    pub max_element_size: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            trim_text: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_element_size: DEFAULT_MAX_ELEMENT_SIZE,
        }
    }
}

/// Streaming token source over any buffered reader
pub struct XmlTokenSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    options: SourceOptions,
    /// End tag owed for the last `<name/>` start reported
    pending_end: Option<Name>,
    /// Elements opened by `next_token` and not yet closed, innermost last
    open: Vec<Name>,
}

impl<R: BufRead> XmlTokenSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self::with_options(reader, SourceOptions::default())
    }

    pub fn with_options(reader: R, options: SourceOptions) -> Self {
        let mut reader = Reader::from_reader(reader);
        let config = reader.config_mut();
        config.trim_text(options.trim_text);
        config.check_end_names = true;
        Self {
            reader,
            buf: Vec::new(),
            options,
            pending_end: None,
            open: Vec::new(),
        }
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// Byte offset of the reader in the underlying stream
    pub fn buffer_position(&self) -> u64 {
        self.reader.buffer_position()
    }
}

impl<'a> XmlTokenSource<&'a [u8]> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::from_reader(bytes)
    }
}

impl XmlTokenSource<BufReader<File>> {
    pub fn from_file(path: impl AsRef<Path>, options: SourceOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ParseError::from(e).with_context(path.display().to_string()))?;
        Ok(Self::with_options(BufReader::new(file), options))
    }
}

impl<R: BufRead> TokenSource for XmlTokenSource<R> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Token::End(name)));
        }

        self.buf.clear();
        let token = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(e) => {
                let start = start_tag(&e)?;
                if self.open.len() >= self.options.max_depth {
                    return Err(ParseError::security(SecurityError::MaxDepthExceeded(
                        self.options.max_depth,
                    ))
                    .with_context(format!("at <{}>", start.name)));
                }
                self.open.push(start.name.clone());
                Token::Start(start)
            }
            Event::Empty(e) => {
                let start = start_tag(&e)?;
                self.pending_end = Some(start.name.clone());
                Token::Start(start)
            }
            Event::End(e) => {
                self.open.pop();
                Token::End(name(e.name())?)
            }
            Event::Text(e) => Token::Text(e.unescape()?.into_owned()),
            Event::CData(e) => Token::CData(str::from_utf8(&e)?.to_owned()),
            Event::Comment(e) => Token::Comment(str::from_utf8(&e)?.to_owned()),
            Event::PI(e) => Token::ProcInst(str::from_utf8(&e)?.to_owned()),
            Event::Decl(e) => Token::Decl(str::from_utf8(&e)?.to_owned()),
            Event::DocType(e) => Token::DocType(str::from_utf8(&e)?.to_owned()),
            Event::Eof => match self.open.last() {
                Some(innermost) => {
                    return Err(ParseError::syntax(SyntaxError::UnexpectedEOF(
                        innermost.to_string(),
                    )))
                }
                None => Token::Eof,
            },
        };
        Ok(Some(token))
    }

    fn decode_element(&mut self, start: &StartTag) -> Result<Capture> {
        // An empty-element tag has no content; its owed end tag closes it.
        if self.pending_end.take().is_some() {
            return Ok(Capture::default());
        }

        let mut writer = Writer::new(Vec::new());
        let mut capture = Capture::default();
        let mut depth = 0usize;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    depth += 1;
                    if depth > self.options.max_depth {
                        return Err(ParseError::security(SecurityError::MaxDepthExceeded(
                            self.options.max_depth,
                        ))
                        .with_context(format!("inside <{}>", start.name)));
                    }
                    writer.write_event(Event::Start(e))?;
                }
                Event::End(e) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    writer.write_event(Event::End(e))?;
                }
                Event::Empty(e) => writer.write_event(Event::Empty(e))?,
                Event::Text(e) => {
                    if depth == 0 {
                        capture.chardata.push_str(&e.unescape()?);
                    }
                    writer.write_event(Event::Text(e))?;
                }
                Event::CData(e) => {
                    if depth == 0 {
                        capture.chardata.push_str(str::from_utf8(&e)?);
                    }
                    writer.write_event(Event::CData(e))?;
                }
                Event::Comment(e) => {
                    if depth == 0 {
                        capture.comment.push_str(str::from_utf8(&e)?);
                    }
                    writer.write_event(Event::Comment(e))?;
                }
                Event::PI(e) => writer.write_event(Event::PI(e))?,
                // Only legal in the prolog; the reader rejects them elsewhere.
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => {
                    return Err(ParseError::syntax(SyntaxError::UnexpectedEOF(
                        start.name.to_string(),
                    )))
                }
            }

            if writer.get_ref().len() > self.options.max_element_size {
                return Err(ParseError::security(SecurityError::MaxElementSizeExceeded(
                    self.options.max_element_size,
                ))
                .with_context(format!("inside <{}>", start.name)));
            }
        }

        // The closing tag was consumed here rather than by `next_token`.
        self.open.pop();
        capture.inner_xml = String::from_utf8(writer.into_inner())?;
        trace!(
            element = %start.name,
            inner_len = capture.inner_xml.len(),
            "captured element"
        );
        Ok(capture)
    }
}

fn start_tag(e: &BytesStart<'_>) -> Result<StartTag> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        attrs.push(Attr::new(name(attr.key)?, value));
    }
    Ok(StartTag {
        name: name(e.name())?,
        attrs,
    })
}

fn name(qname: QName<'_>) -> Result<Name> {
    let local = str::from_utf8(qname.local_name().as_ref())?.to_owned();
    let prefix = match qname.prefix() {
        Some(prefix) => Some(str::from_utf8(prefix.as_ref())?.to_owned()),
        None => None,
    };
    Ok(Name { prefix, local })
}
