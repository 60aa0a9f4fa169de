//! Token sources feeding the fragment parser.
//!
//! The parser needs exactly two things from an XML reader: the next token,
//! and the ability to consume the subtree under a start tag it has just
//! received. [`TokenSource`] captures that contract so the state machine does
//! not depend on a concrete pull parser. [`XmlTokenSource`] is the adapter over
//! `quick-xml`.

pub mod xml;

pub use xml::{SourceOptions, XmlTokenSource, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ELEMENT_SIZE};

use crate::error::Result;
use crate::token::{StartTag, Token};

/// Generic, untyped decode target for one element subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    /// Serialized markup between the start and end tag
    pub inner_xml: String,
    /// Text and CDATA that are direct children of the element
    pub chardata: String,
    /// Comments that are direct children of the element
    pub comment: String,
}

pub trait TokenSource {
    /// Returns the next token.
    ///
    /// End of input is `Ok(Some(Token::Eof))`. A well-behaved source never
    /// returns `Ok(None)`; the parser treats it as a protocol violation.
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Consumes the subtree opened by `start`, which must be the start tag
    /// most recently returned by [`next_token`](Self::next_token), and leaves
    /// the stream positioned after its end tag.
    fn decode_element(&mut self, start: &StartTag) -> Result<Capture>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }

    fn decode_element(&mut self, start: &StartTag) -> Result<Capture> {
        (**self).decode_element(start)
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }

    fn decode_element(&mut self, start: &StartTag) -> Result<Capture> {
        (**self).decode_element(start)
    }
}
