//! Error handling types for the fragment parser
//!
//! Every failure is terminal for the scan that produced it. Errors raised by a
//! caller's fragment callback never pass through this type: they are handed
//! back to the caller unchanged.

use quick_xml::events::attributes::AttrError;
use std::{error::Error, fmt, io};

/// Main error type for scanning and decoding operations
#[derive(Debug)]
pub struct ParseError {
    /// The specific kind of error
    kind: ParseErrorKind,
    /// Source error that caused this error
    source: Option<Box<dyn Error + Send + Sync>>,
    /// Additional context for the error
    context: Option<String>,
}

/// Top-level error categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    IO(IOError),
    Syntax(SyntaxError),
    Protocol(ProtocolError),
    Decode(DecodeError),
    Config(ConfigError),
    Security(SecurityError),
}

/// IO operation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IOError {
    /// File not found
    FileNotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// Error reading from the underlying stream
    ReadError(String),
    /// Error writing output
    WriteError(String),
}

/// Malformed XML reported by the token source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The pull parser rejected the document
    Malformed(String),
    /// An attribute could not be parsed
    InvalidAttribute(String),
    /// Bytes that are not valid UTF-8
    InvalidEncoding(String),
    /// The stream ended inside the named element
    UnexpectedEOF(String),
}

/// Token source contract violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The source produced neither a token nor end-of-stream
    UnexpectedEndOfToken,
}

/// Errors raised while materializing a captured element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The rebuilt document did not fit the destination type
    Deserialize(String),
    /// The element could not be serialized back to XML
    Encode(String),
}

/// Invalid matching configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No body element name was configured
    MissingBody,
    /// A header entry was the empty string
    EmptyHeaderName,
}

/// Resource limits enforced while capturing elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Exceeded maximum nesting depth inside a captured element
    MaxDepthExceeded(usize),
    /// Exceeded maximum captured markup size
    MaxElementSizeExceeded(usize),
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            source: None,
            context: None,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub(crate) fn syntax(err: SyntaxError) -> Self {
        Self::new(ParseErrorKind::Syntax(err))
    }

    pub(crate) fn security(err: SecurityError) -> Self {
        Self::new(ParseErrorKind::Security(err))
    }

    pub(crate) fn config(err: ConfigError) -> Self {
        Self::new(ParseErrorKind::Config(err))
    }

    /// Wraps a failure to write serialized XML
    pub(crate) fn encode(err: io::Error) -> Self {
        Self::new(ParseErrorKind::Decode(DecodeError::Encode(err.to_string()))).with_source(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base_error = match &self.kind {
            ParseErrorKind::IO(err) => err.to_string(),
            ParseErrorKind::Syntax(err) => err.to_string(),
            ParseErrorKind::Protocol(err) => err.to_string(),
            ParseErrorKind::Decode(err) => err.to_string(),
            ParseErrorKind::Config(err) => err.to_string(),
            ParseErrorKind::Security(err) => err.to_string(),
        };

        write!(f, "Error: {}", base_error)?;

        if let Some(ctx) = &self.context {
            write!(f, "\nContext: {}", ctx)?;
        }

        if let Some(source) = &self.source {
            write!(f, "\nCaused by: {}", source)?;
        }

        Ok(())
    }
}

impl fmt::Display for IOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {}", path),
            Self::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            Self::ReadError(msg) => write!(f, "Read error: {}", msg),
            Self::WriteError(msg) => write!(f, "Write error: {}", msg),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "Malformed XML: {}", msg),
            Self::InvalidAttribute(msg) => write!(f, "Invalid attribute: {}", msg),
            Self::InvalidEncoding(msg) => write!(f, "Invalid UTF-8: {}", msg),
            Self::UnexpectedEOF(name) => {
                write!(f, "Unexpected end of file inside element <{}>", name)
            }
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfToken => write!(f, "unexpected end of token"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deserialize(msg) => write!(f, "Cannot decode element: {}", msg),
            Self::Encode(msg) => write!(f, "Cannot encode element: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody => write!(f, "A body element name is required"),
            Self::EmptyHeaderName => write!(f, "Header element names must not be empty"),
        }
    }
}

impl fmt::Display for SecurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxDepthExceeded(max) => write!(f, "Maximum nesting depth {} exceeded", max),
            Self::MaxElementSizeExceeded(max) => {
                write!(f, "Maximum element size of {} bytes exceeded", max)
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn Error + 'static))
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => IOError::FileNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => IOError::PermissionDenied(err.to_string()),
            _ => IOError::ReadError(err.to_string()),
        };
        Self::new(ParseErrorKind::IO(kind)).with_source(err)
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        let kind = match &err {
            quick_xml::Error::Io(io) => ParseErrorKind::IO(IOError::ReadError(io.to_string())),
            quick_xml::Error::InvalidAttr(attr) => {
                ParseErrorKind::Syntax(SyntaxError::InvalidAttribute(attr.to_string()))
            }
            other => ParseErrorKind::Syntax(SyntaxError::Malformed(other.to_string())),
        };
        Self::new(kind).with_source(err)
    }
}

impl From<AttrError> for ParseError {
    fn from(err: AttrError) -> Self {
        Self::syntax(SyntaxError::InvalidAttribute(err.to_string())).with_source(err)
    }
}

impl From<quick_xml::DeError> for ParseError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::new(ParseErrorKind::Decode(DecodeError::Deserialize(err.to_string()))).with_source(err)
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::syntax(SyntaxError::InvalidEncoding(err.to_string())).with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for ParseError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::syntax(SyntaxError::InvalidEncoding(err.to_string())).with_source(err)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
