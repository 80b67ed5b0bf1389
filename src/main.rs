use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sms_remote::modules::{self, Catalog};
use sms_remote::{Config, Dispatcher, LoggingExecutor};

/// SMS Remote - control module registry and command gate
#[derive(Parser)]
#[command(name = "sms-remote", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/sms-remote/config.toml)
    #[arg(short, long, env = "SMS_REMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all control modules
    Modules {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a module's commands, version window and permissions
    Describe {
        /// Module id (e.g. "bluetooth")
        id: String,
    },
    /// Check whether a module may currently run
    Check {
        /// Module id
        id: String,
        /// Platform version to check against (overrides config)
        #[arg(long)]
        platform_version: Option<i32>,
        /// Additionally granted permission (repeatable)
        #[arg(long = "grant")]
        grants: Vec<String>,
    },
    /// Run a message through the dispatcher without touching hardware
    Dispatch {
        /// Sender phone number
        #[arg(short, long)]
        sender: String,
        /// Message text; commands separated by ';' or newlines
        message: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn,sms_remote=info",
        1 => "info,sms_remote=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let catalog = modules::catalog::init()?;

    match cli.command {
        Command::Modules { json } => list_modules(catalog, json),
        Command::Describe { id } => describe(catalog, &id),
        Command::Check {
            id,
            platform_version,
            grants,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(version) = platform_version {
                config.platform_version = version;
            }
            config.granted_permissions.extend(grants);
            check(catalog, &config, &id)
        }
        Command::Dispatch { sender, message } => {
            let config = Config::load(cli.config.as_deref())?;
            dispatch(catalog, &config, &sender, &message).await
        }
    }
}

fn list_modules(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.all_modules())?);
        return Ok(());
    }

    for module in catalog.iter() {
        let commands: Vec<&str> = module
            .commands()
            .iter()
            .map(sms_remote::Command::as_str)
            .collect();
        println!(
            "{:<14} {:<10} {}",
            module.id(),
            module.window().to_string(),
            commands.join(", ")
        );
    }
    Ok(())
}

fn describe(catalog: &Catalog, id: &str) -> anyhow::Result<()> {
    let module = catalog
        .find_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("no module with id '{id}'"))?;

    println!("module:      {}", module.id());
    println!("title:       {}", module.title_ref());
    println!("platform:    {}", module.window());
    if module.required_permissions().is_empty() {
        println!("permissions: (none)");
    } else {
        println!("permissions: {}", module.required_permissions().join(", "));
    }
    println!("commands:");
    println!("{}", module.commands_string());
    Ok(())
}

fn check(catalog: &Catalog, config: &Config, id: &str) -> anyhow::Result<()> {
    let module = catalog
        .find_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("no module with id '{id}'"))?;

    let eligibility = config.gate().eligibility(module);
    println!("{}: {eligibility}", module.id());
    if !eligibility.is_eligible() {
        anyhow::bail!("module '{id}' is not eligible");
    }
    Ok(())
}

async fn dispatch(
    catalog: &Catalog,
    config: &Config,
    sender: &str,
    message: &str,
) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(
        catalog,
        config.gate(),
        Arc::new(config.user_data_store()),
        Arc::new(LoggingExecutor::new()),
    );

    for outcome in dispatcher.dispatch_message(sender, message).await {
        println!("{outcome}");
    }
    Ok(())
}
