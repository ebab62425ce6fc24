//! Purpose: `baxus-dump` CLI entry point.
//! Role: Binary crate root; parses args, runs one fetch-and-dump, reports on stdout.
//! Invariants: stdout carries exactly one line: the saved or failed-status message.
//! Invariants: Faults are emitted on stderr (text on a TTY, JSON otherwise).
//! Invariants: Process exit code is derived from `to_exit_code`; a non-200 status exits 0.
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use baxus_dump::config::{DEFAULT_INDENT, DEFAULT_OUTPUT, parse_http_url};
use baxus_dump::{
    DumpConfig, DumpOutcome, Error, ErrorKind, ListingsQuery, UreqTransport, WriteMode,
    fetch_and_dump, to_exit_code,
};
use clap::{Parser, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "baxus-dump",
    version,
    about = "Fetch BAXUS marketplace listings and save them as pretty-printed JSON",
    long_about = None,
    after_help = r#"EXAMPLES
  $ baxus-dump                          # first 10000 listings into ./data.json
  $ baxus-dump --output listings.json --atomic
  $ baxus-dump --size 500
  $ RUST_LOG=debug baxus-dump           # request/response details on stderr"#
)]
struct Cli {
    #[arg(
        long,
        value_name = "URL",
        conflicts_with_all = ["from", "size"],
        help = "Full URL to fetch (default: the BAXUS listings search endpoint)",
        value_hint = ValueHint::Url
    )]
    url: Option<String>,
    #[arg(long, help = "Listings offset used to build the default URL (default: 0)")]
    from: Option<u64>,
    #[arg(long, help = "Listings page size used to build the default URL (default: 10000)")]
    size: Option<u64>,
    #[arg(
        long,
        short,
        default_value = DEFAULT_OUTPUT,
        help = "File to write; existing content is overwritten",
        value_hint = ValueHint::FilePath
    )]
    output: PathBuf,
    #[arg(long, default_value_t = DEFAULT_INDENT, help = "Spaces per indentation level")]
    indent: usize,
    #[arg(long, help = "Write to a temp file and rename it into place")]
    atomic: bool,
}

impl Cli {
    fn into_config(self) -> Result<DumpConfig, Error> {
        let url = match (self.url, self.from, self.size) {
            (Some(raw), _, _) => parse_http_url(&raw)?,
            (None, None, None) => DumpConfig::default().url,
            (None, from, size) => {
                let defaults = ListingsQuery::default();
                ListingsQuery {
                    from: from.unwrap_or(defaults.from),
                    size: size.unwrap_or(defaults.size),
                }
                .url()?
            }
        };
        let write_mode = if self.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Direct
        };
        Ok(DumpConfig::new(url, self.output)
            .with_indent(self.indent)
            .with_write_mode(write_mode))
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(());
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `baxus-dump --help`."));
            }
        },
    };

    let config = cli.into_config()?;
    let transport = UreqTransport::new();
    match fetch_and_dump(&config, &transport)? {
        DumpOutcome::Saved { path, .. } => {
            println!("Data saved to {}", path.display());
        }
        DumpOutcome::Rejected { status } => {
            println!("Failed to fetch data. Status code: {status}");
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Network => "network error".to_string(),
        ErrorKind::Decode => "invalid json".to_string(),
        ErrorKind::Write => "write failed".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(status) = err.status() {
        inner.insert("status".to_string(), json!(status));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(status) = err.status() {
        lines.push(format!("status: {status}"));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
