mod config;
mod error;
mod report;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facts::{
    AirplaneMode, BatteryLevel, DirectoryCount, FactProvider, LocalClock, Permission,
    PermissionGrants, PermissionRequester, PresetRequester, RadioEnabled, StaticSource, UserInput,
    keys,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "turnstile.toml";

#[derive(Parser)]
#[command(name = "turnstile")]
#[command(about = "Check every access condition against current host state", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ./turnstile.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Request permissions, capture facts, and evaluate every condition
    Check {
        /// Password to compare against the battery percentage (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Override a fact, e.g. --fact contact_count=12
        #[arg(long = "fact", value_name = "KEY=VALUE")]
        facts: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the facts a check would evaluate
    Facts {
        /// Override a fact, e.g. --fact contact_count=12
        #[arg(long = "fact", value_name = "KEY=VALUE")]
        facts: Vec<String>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the conditions in evaluation order
    Conditions,
}

#[tokio::main]
async fn main() {
    init_tracing();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the gate passed; commands that do not evaluate report `true`.
async fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Some(Commands::Check {
            password,
            facts,
            json,
        }) => cmd_check(&config, password, &facts, json).await,
        Some(Commands::Facts { facts, json }) => cmd_facts(&config, &facts, json).await,
        Some(Commands::Conditions) => cmd_conditions(&config),
        None => cmd_check(&config, None, &[], false).await,
    }
}

async fn cmd_check(
    config: &Config,
    password: Option<String>,
    overrides: &[String],
    json: bool,
) -> Result<bool> {
    let gate = config.policy.build_gate()?;
    let provider = build_provider(config, overrides)?;

    let grants = acquire_permissions(&provider, &requester(config)).await;
    for notice in grants.denial_notices() {
        eprintln!("{notice}");
    }

    let input = match password {
        Some(p) => UserInput::new(p),
        None => prompt_password(&mut io::stderr(), &mut io::stdin().lock())?,
    };

    let snapshot = provider.capture(&input);
    let result = gate.evaluate(&snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", report::render_result(&result));
    }

    Ok(result.passed())
}

async fn cmd_facts(config: &Config, overrides: &[String], json: bool) -> Result<bool> {
    let provider = build_provider(config, overrides)?;
    acquire_permissions(&provider, &requester(config)).await;

    let snapshot = provider.capture(&UserInput::default());
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", report::render_snapshot(&snapshot));
    }
    Ok(true)
}

fn cmd_conditions(config: &Config) -> Result<bool> {
    let gate = config.policy.build_gate()?;

    if gate.is_empty() {
        println!("No conditions registered; every check passes.");
        return Ok(true);
    }

    println!("{:<4}  {:<22}  FAILURE MESSAGE", "#", "CONDITION");
    println!("{}", "-".repeat(72));
    for (i, condition) in gate.conditions().iter().enumerate() {
        println!(
            "{:<4}  {:<22}  {}",
            i + 1,
            condition.name(),
            condition.failure_message()
        );
    }
    println!(
        "\nthreshold: {}  time window: {}",
        config.policy.resource_threshold, config.policy.time_window
    );
    Ok(true)
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::ConfigNotFound { path });
        }
        debug!(path = %path.display(), "loading config");
        return Ok(Config::load(&path)?);
    }

    let default_path = PathBuf::from(CONFIG_FILE);
    if default_path.exists() {
        debug!(path = CONFIG_FILE, "loading config");
        Ok(Config::load(&default_path)?)
    } else {
        debug!("no config file, using defaults");
        Ok(Config::default())
    }
}

fn requester(config: &Config) -> PresetRequester {
    PresetRequester::new(config.permissions.granted.iter().copied())
}

/// Request every permission and record the answers for the next capture.
async fn acquire_permissions(
    provider: &FactProvider,
    requester: &impl PermissionRequester,
) -> PermissionGrants {
    let grants = requester.request(&Permission::ALL).await;
    info!(denied = grants.denied().len(), "permission request completed");
    provider.apply_grants(&grants);
    grants
}

/// Host sources first, then `[facts]` from config, then `--fact` overrides;
/// later sources win. Contacts and images are only listed once the matching
/// permission is granted.
fn build_provider(config: &Config, overrides: &[String]) -> Result<FactProvider> {
    let sources = &config.sources;
    let mut provider = FactProvider::new()
        .with_source(BatteryLevel::new(&sources.battery))
        .with_source(RadioEnabled::bluetooth(&sources.rfkill))
        .with_source(AirplaneMode::new(&sources.rfkill))
        .with_source(
            DirectoryCount::new(keys::CONTACT_COUNT, sources.contacts_dir())
                .with_extensions(sources.contact_extensions.iter().cloned())
                .requires(Permission::Contacts),
        )
        .with_source(
            DirectoryCount::new(keys::IMAGE_COUNT, sources.images_dir())
                .with_extensions(sources.image_extensions.iter().cloned())
                .requires(Permission::Storage),
        )
        .with_source(LocalClock);

    for (key, value) in &config.facts {
        provider.add_source(StaticSource::new(key.clone(), value.clone()));
    }
    for raw in overrides {
        let source =
            StaticSource::parse_override(raw).ok_or_else(|| Error::InvalidFact(raw.clone()))?;
        provider.add_source(source);
    }

    Ok(provider)
}

/// The prompt goes to `out` (stderr in practice) so stdout carries only the result.
fn prompt_password(out: &mut impl Write, input: &mut impl BufRead) -> Result<UserInput> {
    write!(out, "Password: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(UserInput::new(line.trim_end_matches(['\r', '\n'])))
}
