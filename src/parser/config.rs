use crate::error::{ConfigError, ParseError, Result};
use std::collections::HashMap;

/// Element names that drive fragmentation
///
/// All names are bare local names. Namespace prefixes and URIs are ignored
/// when matching, so `<a:item>` and `<b:item>` both match `item`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Element that opens (and resets) a template. Defaults to `body`
    pub root: Option<String>,
    /// Element whose every occurrence produces a fragment
    pub body: String,
    /// Elements between root and body captured as shared context
    pub headers: Vec<String>,
}

impl Config {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            root: None,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    /// The effective root name; an unset or empty root falls back to the body
    pub fn root_name(&self) -> &str {
        match self.root.as_deref() {
            Some(root) if !root.is_empty() => root,
            _ => &self.body,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.body.is_empty() {
            return Err(ParseError::config(ConfigError::MissingBody));
        }
        if self.headers.iter().any(String::is_empty) {
            return Err(ParseError::config(ConfigError::EmptyHeaderName));
        }
        Ok(())
    }
}

/// Roles a local name plays. A name can be both root and body (the default
/// when no root is configured), or root and header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Roles {
    pub(crate) root: bool,
    pub(crate) header: bool,
    pub(crate) body: bool,
}

/// Lookup table from bare local name to its roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matcher {
    roles: HashMap<String, Roles>,
}

impl Matcher {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut roles: HashMap<String, Roles> = HashMap::with_capacity(config.headers.len() + 2);
        roles.entry(config.root_name().to_string()).or_default().root = true;
        roles.entry(config.body.clone()).or_default().body = true;
        for header in &config.headers {
            roles.entry(header.clone()).or_default().header = true;
        }

        Ok(Self { roles })
    }

    pub(crate) fn roles(&self, local: &str) -> Roles {
        self.roles.get(local).copied().unwrap_or_default()
    }
}
