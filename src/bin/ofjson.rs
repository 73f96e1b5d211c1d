//! Command-line interface for ofjson
//! Reads `ovs-ofctl dump-flows` (or `dump-groups`) output and prints one JSON document per line.
//!
//! Usage:
//!   ofjson [PATH]                    - Convert flow lines from PATH or stdin
//!   ofjson --group [PATH]            - Convert group lines
//!   ofjson --config `<file>` [PATH]   - Layer a TOML config over the defaults
//!   ofjson --max-depth `<n>` [PATH]   - Override the action nesting limit

use clap::{Arg, ArgAction, Command};
use ofjson::config::Loader;
use ofjson::{OfJsonConfig, ParseError};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("ofjson")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert OpenFlow dump-flows / dump-groups output into JSON")
        .arg(
            Arg::new("path")
                .help("Dump output to read (defaults to stdin)")
                .index(1),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .short('g')
                .help("Parse lines as dump-groups output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Deepest accepted action nesting")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("fail-fast")
                .long("fail-fast")
                .help("Stop at the first line that fails to parse")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(&limit) = matches.get_one::<usize>("max-depth") {
        loader = loader.max_depth(limit)?;
    }
    if matches.get_flag("fail-fast") {
        loader = loader.fail_fast(true)?;
    }
    let config = loader.build()?;

    let input: Box<dyn BufRead> = match matches.get_one::<String>("path") {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    convert(input, matches.get_flag("group"), &config)
}

fn convert(
    input: Box<dyn BufRead>,
    groups: bool,
    config: &OfJsonConfig,
) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(io::stdout().lock());
    let mut rejected = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        if line.trim().is_empty() {
            continue;
        }
        if config.input.skip_reply_headers && is_reply_header(&line) {
            debug!(line = number, "skipping reply header");
            continue;
        }

        match render(&line, groups, config) {
            Ok(json) => writeln!(out, "{json}")?,
            Err(err) if config.input.fail_fast => {
                out.flush()?;
                return Err(format!("line {number}: {err}").into());
            }
            Err(err) => {
                rejected += 1;
                warn!(line = number, error = %err, "skipping line");
            }
        }
    }

    out.flush()?;
    if rejected > 0 {
        warn!(rejected, "some lines could not be parsed");
    }
    Ok(())
}

fn render(line: &str, groups: bool, config: &OfJsonConfig) -> Result<String, ParseError> {
    if groups {
        let group = ofjson::parse_group_with_options(line, &config.parser)?;
        ofjson::formats::json::to_string(&group)
    } else {
        let rule = ofjson::parse_rule_with_options(line, &config.parser)?;
        ofjson::formats::json::to_string(&rule)
    }
}

/// Banners such as `NXST_FLOW reply (xid=0x4):` or
/// `OFPST_GROUP_DESC reply (OF1.3) (xid=0x2):`
fn is_reply_header(line: &str) -> bool {
    let line = line.trim();
    match line.split_once(' ') {
        Some((kind, rest)) => {
            kind.contains("ST_") && rest.starts_with("reply") && line.ends_with(':')
        }
        None => false,
    }
}
