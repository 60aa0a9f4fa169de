use crate::{
    error::{DecodeError, IOError, ParseError, ParseErrorKind, Result},
    fragment::Fragment,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

/// How the command-line tool renders each fragment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One standalone XML document per fragment
    #[default]
    Xml,
    /// One JSON object per line
    Json,
}

pub fn format_fragment(fragment: &Fragment, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Xml => fragment.to_xml(),
        OutputFormat::Json => serde_json::to_string(fragment).map_err(|e| {
            ParseError::new(ParseErrorKind::Decode(DecodeError::Encode(e.to_string())))
                .with_source(e)
        }),
    }
}

/// Opens `path` for writing, or stdout when no path is given
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| write_error(path, e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

pub fn write_line(out: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(|e| write_error("output", e))
}

fn write_error(path: &str, e: io::Error) -> ParseError {
    let kind = match e.kind() {
        io::ErrorKind::PermissionDenied => IOError::PermissionDenied(path.to_string()),
        _ => IOError::WriteError(e.to_string()),
    };
    ParseError::new(ParseErrorKind::IO(kind)).with_source(e)
}
