//! CLI module for fleetinv
//!
//! Argument parsing for the dynamic inventory binary. Ansible invokes the
//! script with `--list` or `--host <name>`; the remaining flags override
//! configuration.

use clap::{ArgGroup, Parser};
use fleetinv::config::{Config, LogFormat};
use fleetinv::inventory::AliasStrategy;
use std::path::PathBuf;

/// fleetinv - Ansible dynamic inventory from the fleet node catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "fleetinv")]
#[command(author = "Fleetinv Contributors")]
#[command(version)]
#[command(about = "Ansible dynamic inventory generated from the fleet node catalog", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["list", "host"])))]
pub struct Cli {
    /// Print the full inventory (default)
    #[arg(long)]
    pub list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "FLEETINV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the inventory catalog API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Credential profile selector
    #[arg(long)]
    pub profile: Option<String>,

    /// Region selector
    #[arg(long)]
    pub region: Option<String>,

    /// Read node records from a JSON or YAML file instead of the catalog
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Alias strategy (domain or gateway)
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<AliasStrategy>,

    /// Value for ansible_python_interpreter
    #[arg(long, value_name = "PATH")]
    pub python_interpreter: Option<PathBuf>,

    /// Also create a group per node tag
    #[arg(long)]
    pub tag_groups: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_strategy(s: &str) -> Result<AliasStrategy, String> {
    s.parse()
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref url) = self.base_url {
            config.source.base_url = Some(url.clone());
        }
        if let Some(ref profile) = self.profile {
            config.source.profile = profile.clone();
        }
        if let Some(ref region) = self.region {
            config.source.region = region.clone();
        }
        if let Some(ref file) = self.file {
            config.source.file = Some(file.clone());
        }
        if let Some(strategy) = self.strategy {
            config.projection.alias_strategy = strategy;
        }
        if let Some(ref interpreter) = self.python_interpreter {
            config.projection.python_interpreter = Some(interpreter.display().to_string());
        }
        if self.tag_groups {
            config.projection.tag_groups = true;
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }
    }
}
