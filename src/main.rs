//! fleetinv - Ansible dynamic inventory from the fleet node catalog
//!
//! This is the entry point Ansible executes. The inventory JSON is the only
//! thing written to stdout; logs go to stderr.

mod cli;

use anyhow::Result;
use cli::Cli;
use fleetinv::config::{Config, LogFormat, LoggingConfig};
use fleetinv::inventory::{HostProjector, InventoryDocument};
use fleetinv::source::create_source;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    let loaded = Config::load(cli.config.as_deref());

    // Initialize logging based on verbosity and configured level
    let logging = match &loaded {
        Ok(config) => {
            let mut config = config.clone();
            cli.apply_to(&mut config);
            config.logging
        }
        Err(_) => LoggingConfig::default(),
    };
    init_logging(cli.verbosity(), &logging);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let e = fleetinv::Error::from(e);
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };
    cli.apply_to(&mut config);
    tracing::debug!(
        strategy = %config.projection.alias_strategy,
        file = ?config.source.file,
        base_url = ?config.source.base_url,
        "configuration loaded"
    );

    match run(&cli, &config).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Generate the inventory and render the requested view
async fn run(cli: &Cli, config: &Config) -> fleetinv::Result<String> {
    config.validate()?;

    let source = create_source(&config.source)?;
    let projector = HostProjector::new(config.projection.clone());
    let document = fleetinv::generate_inventory(source.as_ref(), &projector).await?;

    render(&document, cli.host.as_deref(), cli.pretty)
}

/// Render `--list` or `--host` output
fn render(
    document: &InventoryDocument,
    host: Option<&str>,
    pretty: bool,
) -> fleetinv::Result<String> {
    let value = match host {
        Some(alias) => match document.host_vars(alias) {
            Some(vars) => serde_json::to_value(vars)?,
            None => {
                tracing::warn!(host = alias, "host not found in inventory");
                serde_json::Value::Object(serde_json::Map::new())
            }
        },
        None => document.to_json()?,
    };

    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Initialize logging on stderr
fn init_logging(verbosity: u8, logging: &LoggingConfig) {
    let filter = match verbosity {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbosity >= 3),
            )
            .with(env_filter)
            .init(),
    }
}
