use clap::Parser;
use std::io::Write;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use xmlfrag::{
    error::{IOError, ParseError, ParseErrorKind, Result},
    parse_file,
    utils::{format_fragment, open_output, write_line, OutputFormat},
    Config, SourceOptions,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input XML file path
    #[arg(short, long)]
    file: String,

    /// Element emitted once per fragment
    #[arg(short, long)]
    body: String,

    /// Element that opens a new header scope (defaults to the body)
    #[arg(short, long)]
    root: Option<String>,

    /// Element captured as context for the bodies that follow (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME")]
    headers: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Trim whitespace around text and drop indentation
    #[arg(long)]
    trim: bool,

    /// Output file path
    #[arg(short, long)]
    output: Option<String>,

    /// Stop after this many fragments
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,
}

/// Reasons the fragment callback ends the scan
enum Stop {
    Limit,
    Failed(ParseError),
}

impl From<ParseError> for Stop {
    fn from(err: ParseError) -> Self {
        Self::Failed(err)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config = Config {
        root: args.root,
        body: args.body,
        headers: args.headers,
    };
    let options = SourceOptions {
        trim_text: args.trim,
        ..SourceOptions::default()
    };

    info!("Reading file: {}", args.file);
    let mut out = open_output(args.output.as_deref())?;
    let mut written = 0u64;

    let result = parse_file(&args.file, &config, options, |fragment| {
        let line = format_fragment(&fragment, args.format)?;
        write_line(out.as_mut(), &line)?;
        written += 1;
        if args.limit == Some(written) {
            return Err(Stop::Limit);
        }
        Ok(())
    });

    match result {
        Ok(()) => {}
        Err(Stop::Limit) => warn!("Stopped after {} fragments", written),
        Err(Stop::Failed(e)) => return Err(e),
    }

    out.flush().map_err(|e| {
        ParseError::new(ParseErrorKind::IO(IOError::WriteError(e.to_string()))).with_source(e)
    })?;
    info!("Wrote {} fragments", written);
    Ok(())
}
