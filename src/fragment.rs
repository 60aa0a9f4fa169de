//! The fragment state machine.
//!
//! The scanner is either idle (no root seen yet) or inside a template: the
//! most recent root start tag plus every header element captured since then.
//! Each body element is combined with an immutable snapshot of the template
//! and handed out as a [`Fragment`].

use crate::element::{self, Element};
use crate::error::Result;
use crate::parser::Matcher;
use crate::source::TokenSource;
use crate::token::StartTag;
use quick_xml::Writer;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// One body occurrence together with the root and headers scoping it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub root: StartTag,
    /// Headers captured under `root` before this body, in document order
    pub headers: Arc<[Element]>,
    pub body: Element,
}

impl Fragment {
    /// Finds the first header with the given local name
    pub fn header(&self, local: &str) -> Option<&Element> {
        self.headers.iter().find(|h| h.name.local == local)
    }

    /// Renders the fragment as a standalone XML document.
    ///
    /// The headers and body are wrapped in the root tag. When the root tag
    /// is the body itself only the body is written.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        let wraps = self.root != self.body.start_tag();

        if wraps {
            element::write_start(&mut writer, &self.root.name, &self.root.attrs)?;
        }
        for header in self.headers.iter() {
            header.write_to(&mut writer)?;
        }
        self.body.write_to(&mut writer)?;
        if wraps {
            element::write_end(&mut writer, &self.root.name)?;
        }

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Root and headers accumulated since the last root reset
#[derive(Debug)]
struct Template {
    root: StartTag,
    headers: Vec<Element>,
    /// Shared copy of `headers`, dropped whenever a header is appended
    snapshot: Option<Arc<[Element]>>,
}

impl Template {
    fn new(root: StartTag) -> Self {
        Self {
            root,
            headers: Vec::new(),
            snapshot: None,
        }
    }

    fn push_header(&mut self, header: Element) {
        self.headers.push(header);
        self.snapshot = None;
    }

    fn snapshot(&mut self) -> Arc<[Element]> {
        let headers = &self.headers;
        Arc::clone(
            self.snapshot
                .get_or_insert_with(|| headers.iter().cloned().collect()),
        )
    }
}

#[derive(Debug)]
enum State {
    Idle,
    InTemplate(Template),
}

/// Per-scan state, driven one start tag at a time
#[derive(Debug)]
pub(crate) struct FragmentMachine<'m> {
    matcher: &'m Matcher,
    state: State,
}

impl<'m> FragmentMachine<'m> {
    pub(crate) fn new(matcher: &'m Matcher) -> Self {
        Self {
            matcher,
            state: State::Idle,
        }
    }

    /// Feeds one start tag. Header and body tags are consumed from `source`
    /// together with their subtree; every other tag is left alone so the scan
    /// continues into its children.
    pub(crate) fn on_start<S>(&mut self, start: StartTag, source: &mut S) -> Result<Option<Fragment>>
    where
        S: TokenSource + ?Sized,
    {
        let roles = self.matcher.roles(&start.name.local);

        if roles.root {
            debug!(root = %start.name, "starting template");
            self.state = State::InTemplate(Template::new(start.clone()));
        }

        let State::InTemplate(template) = &mut self.state else {
            return Ok(None);
        };

        if roles.header {
            let header = element::capture(source, &start)?;
            trace!(header = %header.name, "captured header");
            template.push_header(header);
            return Ok(None);
        }

        if roles.body {
            let body = element::capture(source, &start)?;
            let fragment = Fragment {
                root: template.root.clone(),
                headers: template.snapshot(),
                body,
            };
            debug!(
                body = %fragment.body.name,
                headers = fragment.headers.len(),
                "emitting fragment"
            );
            return Ok(Some(fragment));
        }

        Ok(None)
    }
}
