//! MQTT Topic Authorization CLI
//!
//! Evaluates a single publish or subscribe against a policy file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentinel_mqtt_authz::acl::{self, AttemptedOperation};
use sentinel_mqtt_authz::config::ClientIdentity;
use sentinel_mqtt_authz::qos::Qos;
use sentinel_mqtt_authz::{AuthzConfig, Policy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// MQTT topic authorization for Sentinel
#[derive(Parser, Debug)]
#[command(name = "sentinel-mqtt-authz")]
#[command(author = "Sentinel Contributors")]
#[command(version)]
#[command(about = "Evaluate MQTT publish/subscribe authorization", long_about = None)]
struct Args {
    /// Policy file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Client ID of the connecting client
    #[arg(long, default_value = "sentinel-cli")]
    client_id: String,

    /// Username of the connecting client
    #[arg(short, long)]
    username: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON log format
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    operation: Operation,
}

#[derive(Subcommand, Debug)]
enum Operation {
    /// Check a PUBLISH
    Publish {
        topic: String,
        /// QoS level (0, 1 or 2)
        #[arg(short, long, default_value_t = 0)]
        qos: u8,
        /// Publish as a retained message
        #[arg(short, long)]
        retain: bool,
    },
    /// Check a SUBSCRIBE
    Subscribe {
        topic: String,
        /// QoS level (0, 1 or 2)
        #[arg(short, long, default_value_t = 0)]
        qos: u8,
    },
}

/// Exit status for a policy or argument error, distinct from DENY
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    // Load configuration
    let config: AuthzConfig = if let Some(config_path) = &args.config {
        info!(path = %config_path.display(), "Loading policy from file");
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?
    } else {
        AuthzConfig::default()
    };

    let policy = Policy::from_config(&config).context("Invalid policy")?;

    let identity = ClientIdentity::new(args.client_id, args.username.as_deref());
    let result = policy.resolve(&identity);

    let operation = match &args.operation {
        Operation::Publish { topic, qos, retain } => AttemptedOperation::Publish {
            topic,
            qos: Qos::try_from(*qos)?,
            retained: *retain,
        },
        Operation::Subscribe { topic, qos } => AttemptedOperation::Subscribe {
            topic,
            qos: Qos::try_from(*qos)?,
        },
    };

    let decision = acl::evaluate(&operation, &result);

    match decision.matched_rule {
        Some(index) => println!(
            "{} (rule {}: {})",
            decision.behaviour,
            index,
            result.permissions()[index].filter()
        ),
        None => println!("{} (default)", decision.behaviour),
    }

    Ok(if decision.is_accept() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
