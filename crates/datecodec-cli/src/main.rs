use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use datecodec_core::{DateCodec, DateRange};

#[derive(Parser, Debug)]
#[command(
    name = "datecodec",
    version,
    about = "Decode and encode \"Mon, 02 Jan 2006 15:04:05 -0700\" timestamps"
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one timestamp, quoted as JSON or bare
    Parse { text: String },

    /// Print an RFC 3339 timestamp in the wire layout, keeping its offset
    Format { rfc3339: String },

    /// Re-encode a {"from","to"} document, or one wrapped in {"daterange": ...}
    Range {
        /// JSON file to read (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// `parse` の出力。rfc3339 / utc は chrono の serde 実装（RFC 3339）で書き出す
#[derive(Debug, Serialize)]
struct ParseReport {
    rfc3339: DateTime<FixedOffset>,
    utc: DateTime<Utc>,
    wire: String,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// JSON で quote された文字列、または layout のテキストをそのまま受け付ける
fn render_parse(text: &str) -> Result<String> {
    let date = if text.trim_start().starts_with('"') {
        DateCodec::decode(text.trim().as_bytes())
    } else {
        text.parse()
    }
    .with_context(|| format!("cannot decode {text:?}"))?;

    let report = ParseReport {
        rfc3339: date.instant(),
        utc: date.to_utc(),
        wire: date.to_wire_string()?,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render_format(rfc3339: &str) -> Result<String> {
    let instant = DateTime::parse_from_rfc3339(rfc3339)
        .with_context(|| format!("{rfc3339:?} is not an RFC 3339 timestamp"))?;
    Ok(DateCodec::new(instant).to_wire_string()?)
}

/// range を再 encode する。from / to 以外のキーはそのまま残す
fn render_range(input: &[u8]) -> Result<String> {
    let mut doc: Value = serde_json::from_slice(input).context("input is not JSON")?;
    // {"daterange": {...}} とそのままの {"from", "to"} の両方を受け付ける
    let wrapped = doc.get("daterange").is_some();
    let target = if wrapped { &mut doc["daterange"] } else { &mut doc };
    let range = DateRange::deserialize(&*target).context("cannot decode range document")?;
    if !range.is_ordered() {
        tracing::warn!(from = %range.from, to = %range.to, "range ends before it starts");
    }

    match target {
        Value::Object(fields) => {
            fields.insert("from".to_owned(), serde_json::to_value(range.from)?);
            fields.insert("to".to_owned(), serde_json::to_value(range.to)?);
        }
        // [from, to] の配列形式は object に書き直す
        other => *other = serde_json::to_value(range)?,
    }
    Ok(format!(
        "{}\nspan: {}s",
        serde_json::to_string(&doc)?,
        range.span().num_seconds()
    ))
}

fn read_input(file: Option<PathBuf>) -> Result<Vec<u8>> {
    let input = match &file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };
    tracing::debug!(bytes = input.len(), "read range document");
    Ok(input)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let out = match cli.cmd {
        Command::Parse { text } => render_parse(&text)?,
        Command::Format { rfc3339 } => render_format(&rfc3339)?,
        Command::Range { file } => render_range(&read_input(file)?)?,
    };
    println!("{out}");
    Ok(())
}
