//! MRTG probe for UBNT devices polled over HTTP
//!
//! Logs in to the device web UI, fetches one data source as JSON and
//! prints the values of two dotted keys, one per line, optionally
//! rescaled by a formula. MRTG treats any output as data, so failures
//! are printed as `ERROR: <message>` and the process still exits 0.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use check_lib::formula::Formula;
use check_lib::lookup::{format_number, lookup, value_to_string};
use check_lib::session::{DeviceSession, SessionConfig};
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// MRTG probe for UBNT devices (over HTTP)
#[derive(Parser)]
#[command(name = "mrtg_ubnt_probe", version)]
#[command(about = "MRTG probe for UBNT devices (over HTTP)")]
struct Cli {
    /// Device URL, e.g. http://example.com:8080 or https://example.com
    #[arg(short = 'H', long, env = "UBNT_HOST")]
    host: String,

    /// Username for the device web UI
    #[arg(short = 'U', long, env = "UBNT_USERNAME", default_value = "ubnt")]
    username: String,

    /// Password for the device web UI
    #[arg(short = 'P', long, env = "UBNT_PASSWORD")]
    password: String,

    /// Data source polled from the device: GET /<source>.cgi
    #[arg(short, long)]
    source: String,

    /// Exactly two dotted keys to return values for,
    /// e.g. -k airfiber.txcapacity airfiber.rxcapacity
    #[arg(short, long, num_args = 2, required = true)]
    keys: Vec<String>,

    /// Optional formulas applied to the values, in key order; any
    /// occurrence of VAL is replaced by the value and an empty string
    /// skips that value, e.g. -f "VAL*1000" ""
    #[arg(short, long, num_args = 2, allow_hyphen_values = true)]
    formulas: Option<Vec<String>>,

    /// Seconds before the probe times out
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Show debugging information (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        // MRTG reads stdout either way; the error marker is the contract
        Err(err) => println!("ERROR: {err:#}"),
    }
    process::exit(0);
}

async fn run(cli: &Cli) -> Result<Vec<String>> {
    let formulas = parse_formulas(cli)?;

    let config = SessionConfig::new(&cli.host, &cli.username, &cli.password)
        .timeout(Duration::from_secs(cli.timeout))
        .insecure(cli.insecure);
    let session = DeviceSession::new(&config)?;
    let data = session.fetch(&cli.source).await?;

    let url = format!("{}/{}.cgi", cli.host.trim_end_matches('/'), cli.source);
    let mut lines = Vec::new();
    for (key, formula) in cli.keys.iter().zip(&formulas) {
        if key.is_empty() {
            continue;
        }

        let value = lookup(&data, key)
            .with_context(|| format!("no key {key} found in data source (URL: {url})"))?;
        let mut rendered = value_to_string(value);

        if let Some(formula) = formula {
            let number: f64 = rendered
                .trim()
                .parse()
                .with_context(|| format!("value '{rendered}' for key {key} is not numeric"))?;
            rendered = format_number(formula.apply(number));
        }

        lines.push(rendered);
    }
    Ok(lines)
}

/// Parse the `-f` values up front so a bad formula fails before any I/O.
fn parse_formulas(cli: &Cli) -> Result<Vec<Option<Formula>>> {
    match &cli.formulas {
        Some(raw) => raw
            .iter()
            .map(|text| {
                if text.is_empty() {
                    Ok(None)
                } else {
                    Formula::parse(text).map(Some).map_err(Into::into)
                }
            })
            .collect(),
        None => Ok(vec![None; cli.keys.len()]),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
