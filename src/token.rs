//! Lexical tokens produced by a [`TokenSource`](crate::source::TokenSource).

use serde::Serialize;
use std::{borrow::Cow, fmt};

/// An XML name split at the namespace prefix.
///
/// Matching in this crate only ever looks at [`Name::local`]; the prefix is
/// kept so that captured tags can be written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Name {
    pub prefix: Option<String>,
    pub local: String,
}

impl Name {
    /// Creates an unprefixed name
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// The name as written in the document (`prefix:local`)
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(&self.local),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// A single attribute with its unescaped value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub name: Name,
    pub value: String,
}

impl Attr {
    pub fn new(name: Name, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A start tag: element name plus attributes in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartTag {
    pub name: Name,
    pub attrs: Vec<Attr>,
}

impl StartTag {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// Appends an unprefixed attribute
    pub fn with_attr(mut self, local: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(Name::local(local), value));
        self
    }

    /// Looks up the first attribute with the given local name
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.local == local)
            .map(|attr| attr.value.as_str())
    }
}

/// One lexical unit of an XML stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr="...">`, also reported for `<name/>`
    Start(StartTag),
    /// `</name>`, also reported right after the start of `<name/>`
    End(Name),
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
    /// Processing instruction content between `<?` and `?>`
    ProcInst(String),
    /// XML declaration content between `<?` and `?>`
    Decl(String),
    DocType(String),
    /// Normal end of input
    Eof,
}
