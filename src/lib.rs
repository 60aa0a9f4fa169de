//! xmlfrag: streaming extraction of repeated XML records with their context
//!
//! Large XML exports often repeat a record element many times and put the
//! context those records need (a header block, a batch envelope) only once,
//! ahead of them. This crate scans such a document forward-only and hands the
//! caller one [`Fragment`] per record: the record itself, the enclosing root
//! tag, and the header elements seen since that root opened.
//!
//! - Matching is by bare local name; namespaces are ignored
//! - Captured elements keep their raw markup and can be decoded later into
//!   any `serde` type with [`Element::unmarshal`]
//! - Memory use is bounded by the current template and one fragment
//!
//! # Examples
//! ```
//! use serde::Deserialize;
//! use xmlfrag::{parse_reader, Config, ParseError};
//!
//! #[derive(Deserialize)]
//! struct Item {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Meta {
//!     id: u32,
//! }
//!
//! fn example() -> Result<(), ParseError> {
//!     let xml = "<batch><meta><id>7</id></meta><item><name>a</name></item></batch>";
//!     let config = Config::new("item").with_root("batch").with_headers(["meta"]);
//!
//!     parse_reader(xml.as_bytes(), &config, |fragment| {
//!         let item: Item = fragment.body.unmarshal()?;
//!         if let Some(meta) = fragment.header("meta") {
//!             let meta: Meta = meta.unmarshal()?;
//!             println!("{} in batch {}", item.name, meta.id);
//!         }
//!         Ok(())
//!     })
//! }
//! # example().unwrap();
//! ```

use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, instrument};

pub mod element;
pub mod error;
pub mod fragment;
pub mod parser;
pub mod source;
pub mod token;
pub mod utils;

// Re-exports
pub use element::Element;
pub use error::{ParseError, ParseErrorKind, Result};
pub use fragment::Fragment;
pub use parser::{Config, FragmentParser};
pub use source::{Capture, SourceOptions, TokenSource, XmlTokenSource};
pub use token::{Attr, Name, StartTag, Token};

/// Scans XML from any buffered reader with default [`SourceOptions`]
pub fn parse_reader<R, F, E>(
    reader: R,
    config: &Config,
    on_fragment: F,
) -> std::result::Result<(), E>
where
    R: BufRead,
    F: FnMut(Fragment) -> std::result::Result<(), E>,
    E: From<ParseError>,
{
    let parser = FragmentParser::new(config)?;
    let mut source = XmlTokenSource::from_reader(reader);
    parser.parse(&mut source, on_fragment)
}

/// Streams an XML file from disk
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_file<P, F, E>(
    path: P,
    config: &Config,
    options: SourceOptions,
    on_fragment: F,
) -> std::result::Result<(), E>
where
    P: AsRef<Path>,
    F: FnMut(Fragment) -> std::result::Result<(), E>,
    E: From<ParseError>,
{
    let parser = FragmentParser::new(config)?;
    debug!(body = %config.body, root = %config.root_name(), "opening file");

    let mut source = XmlTokenSource::from_file(path.as_ref(), options)?;
    parser.parse(&mut source, on_fragment)?;

    info!("File scanned successfully");
    Ok(())
}
