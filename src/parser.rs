//! Parser façade: configuration plus the scan loop.

pub mod config;

pub use config::Config;
pub(crate) use config::Matcher;

use crate::error::{ParseError, ParseErrorKind, ProtocolError, Result};
use crate::fragment::{Fragment, FragmentMachine};
use crate::source::TokenSource;
use crate::token::{StartTag, Token};
use tracing::{debug, info, instrument};

/// Splits an XML token stream into [`Fragment`]s
///
/// A parser is immutable once built and may be reused for any number of
/// scans; each call to [`parse`](Self::parse) owns its own template state.
#[derive(Debug, Clone)]
pub struct FragmentParser {
    matcher: Matcher,
}

impl FragmentParser {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::new(config)?,
        })
    }

    /// Scans `source` to the end, calling `on_fragment` for every body.
    ///
    /// The first error stops the scan. Errors from the source are converted
    /// into `E`; errors returned by `on_fragment` are returned as they are,
    /// and no further tokens are read after one.
    #[instrument(skip_all)]
    pub fn parse<S, F, E>(&self, source: &mut S, mut on_fragment: F) -> std::result::Result<(), E>
    where
        S: TokenSource + ?Sized,
        F: FnMut(Fragment) -> std::result::Result<(), E>,
        E: From<ParseError>,
    {
        let mut machine = FragmentMachine::new(&self.matcher);
        let mut emitted = 0usize;

        while let Some(start) = next_start_tag(&mut *source)? {
            if let Some(fragment) = machine.on_start(start, &mut *source)? {
                emitted += 1;
                on_fragment(fragment)?;
            }
        }

        info!(fragments = emitted, "scan complete");
        Ok(())
    }

    /// Collects every fragment into a vector
    pub fn parse_all<S>(&self, source: &mut S) -> Result<Vec<Fragment>>
    where
        S: TokenSource + ?Sized,
    {
        let mut fragments = Vec::new();
        self.parse(source, |fragment| {
            fragments.push(fragment);
            Ok::<(), ParseError>(())
        })?;
        Ok(fragments)
    }
}

/// Skips to the next start tag; `None` once the stream has ended
fn next_start_tag<S>(source: &mut S) -> Result<Option<StartTag>>
where
    S: TokenSource + ?Sized,
{
    loop {
        match source.next_token()? {
            Some(Token::Start(start)) => return Ok(Some(start)),
            Some(Token::Eof) => {
                debug!("end of stream");
                return Ok(None);
            }
            Some(_) => {}
            None => {
                return Err(ParseError::new(ParseErrorKind::Protocol(
                    ProtocolError::UnexpectedEndOfToken,
                )))
            }
        }
    }
}
