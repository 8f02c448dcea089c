//! Nagios plugin for UBNT radios polled over HTTP
//!
//! Logs in to the device web UI, fetches the status JSON and evaluates
//! the device metrics against the configured warning/critical threshold
//! positions. Exactly one status line goes to stdout and the process
//! exits with the matching Nagios return code; logging goes to stderr.

mod airfiber;
mod airmax;
mod device;

use std::process;
use std::time::Duration;

use anyhow::Result;
use check_lib::session::{DeviceSession, SessionConfig};
use check_lib::{CheckEngine, Status, ThresholdError, ThresholdSet};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Nagios plugin for UBNT radios (over HTTP)
#[derive(Parser)]
#[command(name = "check_ubnt_http", version)]
#[command(about = "Nagios plugin for UBNT radios (over HTTP)")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Comma separated warning thresholds, one position per metric
    #[arg(short = 'w', long, allow_hyphen_values = true)]
    warning: Option<String>,

    /// Comma separated critical thresholds, one position per metric
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    critical: Option<String>,

    /// Show debugging information (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    device: Device,
}

/// Connection options
#[derive(Args)]
struct ConnectionArgs {
    /// Device URL, e.g. http://example.com:8080 or https://example.com
    #[arg(short = 'H', long, env = "UBNT_HOST")]
    host: String,

    /// Username for the device web UI
    #[arg(short = 'U', long, env = "UBNT_USERNAME", default_value = "ubnt")]
    username: String,

    /// Password for the device web UI
    #[arg(short = 'P', long, env = "UBNT_PASSWORD")]
    password: String,

    /// Seconds before the plugin times out
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    insecure: bool,
}

#[derive(Subcommand)]
enum Device {
    /// Check an AirMax radio: signal, signal chain0, signal chain1, noise,
    /// ccq, airmax quality, airmax capacity, tx rate, rx rate
    Airmax,

    /// Check an AirFiber 24 radio: rx power per chain, rx/tx capacity,
    /// tx modulation rate, distance, DAC temperatures, GPS quality, GPS sats
    Airfiber {
        /// Comma separated key=value pairs that must match, otherwise the
        /// plugin returns CRITICAL
        #[arg(short = 'b', long, default_value = airfiber::DEFAULT_BOOLEAN_CHECKS)]
        boolean: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (warning, critical) = match parse_thresholds(&cli) {
        Ok(sets) => sets,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let mut engine = CheckEngine::new(warning, critical);
    if let Err(err) = run(&cli, &mut engine).await {
        // Whatever happened upstream, still emit one well-formed line
        engine.override_status(Status::Unknown, &format!("{err:#}"));
    }

    let (line, code) = engine.render();
    println!("{line}");
    process::exit(code);
}

/// Parse the raw `-w`/`-c` option values collected by clap.
fn parse_thresholds(cli: &Cli) -> Result<(ThresholdSet, ThresholdSet), ThresholdError> {
    let warning = match &cli.warning {
        Some(raw) => ThresholdSet::parse("-w/--warning", raw)?,
        None => ThresholdSet::new(),
    };
    let critical = match &cli.critical {
        Some(raw) => ThresholdSet::parse("-c/--critical", raw)?,
        None => ThresholdSet::new(),
    };
    Ok((warning, critical))
}

async fn run(cli: &Cli, engine: &mut CheckEngine) -> Result<()> {
    let config = SessionConfig::new(
        &cli.connection.host,
        &cli.connection.username,
        &cli.connection.password,
    )
    .timeout(Duration::from_secs(cli.connection.timeout))
    .insecure(cli.connection.insecure);
    let session = DeviceSession::new(&config)?;

    match &cli.device {
        Device::Airmax => airmax::run(engine, &session).await,
        Device::Airfiber { boolean } => airfiber::run(engine, &session, boolean).await,
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
