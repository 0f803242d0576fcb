use std::io::Read;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tildee::config::{Config, LogFormat};
use tildee::dump::{self, FragmentKind};

const USAGE: &str = "usage: tildee-dump <kind> [path]";

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::Text, |c| c.log_format))?;

    let config = config.context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let mut args = std::env::args().skip(1);
    let kind = args
        .next()
        .with_context(|| format!("missing fragment kind\n{USAGE}"))?
        .parse::<FragmentKind>()
        .context("Failed to parse fragment kind")?;
    let path = args.next();

    let markup = match path.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fragment file: {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read fragment from stdin")?;
            buf
        }
    };

    if markup.len() > config.max_input_bytes {
        bail!(
            "fragment is {} bytes, limit is {} (DUMP_MAX_INPUT_BYTES)",
            markup.len(),
            config.max_input_bytes
        );
    }

    info!(kind = %kind, bytes = markup.len(), "Extracting fragment");

    let json = dump::extract_json(kind, &markup, config.pretty)
        .with_context(|| format!("Failed to extract {kind}"))?;
    println!("{json}");

    Ok(())
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tildee=debug"));

    // Records go to stdout, so logs stay on stderr.
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?,
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?,
    }

    Ok(())
}
