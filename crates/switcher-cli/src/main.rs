//! Afterburner Switcher CLI
//!
//! Validate the config file and see what the switcher would do right now,
//! without launching anything.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use switcher_core::config::{self, ConfigSnapshot};
use switcher_core::{resolver, Resolution, Tier};
use switcher_inspector::SystemInspector;
use tabled::{settings::Style, Table, Tabled};

#[derive(Parser)]
#[command(name = "switcher")]
#[command(about = "Inspect the MSI Afterburner profile switcher configuration")]
#[command(version)]
struct Cli {
    /// Config file to use
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config file and list its targets
    Check,

    /// Write a config file with default values if none exists
    Init,

    /// Show which target is active right now and the profile it selects
    Probe,
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    setting: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Keyword")]
    keyword: String,
    #[tabled(rename = "Profile")]
    profile: String,
}

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Match")]
    matched: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("switcher=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(switcher_core::default_config_path);

    match cli.command {
        Commands::Check => check(&path),
        Commands::Init => init(&path),
        Commands::Probe => probe(&path),
    }
}

/// Load the config without creating it; the error is reported once, by `main`
fn load(path: &Path) -> Result<ConfigSnapshot> {
    let snapshot = config::load(path).with_context(|| {
        if path.exists() {
            format!("Invalid configuration in {}", path.display())
        } else {
            format!(
                "No configuration at {}. Run `switcher init` to create one",
                path.display()
            )
        }
    })?;
    Ok(snapshot)
}

fn check(path: &Path) -> Result<()> {
    let snapshot = load(path)?;

    println!("\n{}", format!("Configuration: {}", path.display()).bold().cyan());
    println!("{}", "─".repeat(50));

    let rows = vec![
        SettingRow {
            setting: "Afterburner".to_string(),
            value: snapshot.afterburner_path.display().to_string(),
        },
        SettingRow {
            setting: "Profile on".to_string(),
            value: snapshot.profile_on.clone(),
        },
        SettingRow {
            setting: "Profile off".to_string(),
            value: snapshot.profile_off.clone(),
        },
        SettingRow {
            setting: "Mode".to_string(),
            value: snapshot.monitoring_mode.to_string(),
        },
        SettingRow {
            setting: "Delay".to_string(),
            value: format!("{}s", snapshot.delay.as_secs()),
        },
        SettingRow {
            setting: "Notifications".to_string(),
            value: snapshot.notifications.to_string(),
        },
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));

    if snapshot.targets.is_empty() {
        println!("\n{}", "No targets configured; the off-profile will always apply.".yellow());
    } else {
        let rows: Vec<TargetRow> = snapshot
            .targets
            .iter()
            .map(|(keyword, profile)| TargetRow {
                keyword: keyword.to_string(),
                profile: match profile {
                    Some(p) => p.to_string(),
                    None => format!("{} (default)", snapshot.profile_on),
                },
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    if !snapshot.afterburner_path.exists() {
        println!(
            "{} {} does not exist",
            "!".yellow(),
            snapshot.afterburner_path.display()
        );
    }

    println!("{}", "✓ Configuration is valid".green());
    Ok(())
}

fn init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} already exists", path.display().to_string().yellow());
        return Ok(());
    }
    config::write_default(path)?;
    println!("{} {}", "✓ Created".green(), path.display());
    Ok(())
}

fn probe(path: &Path) -> Result<()> {
    let snapshot = load(path)?;
    let inspector = SystemInspector::new();

    println!("\n{}", "Target detection".bold().cyan());
    println!("{}", "─".repeat(40));

    let rows: Vec<TierRow> = Tier::ALL
        .iter()
        .map(|tier| TierRow {
            tier: tier.to_string(),
            matched: tier
                .detect(&inspector, &snapshot.targets)
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    let outcome = match resolver::detect(&inspector, &snapshot.targets) {
        Some(detection) => {
            println!(
                "Active target: {} (via {} tier)",
                detection.keyword.bold(),
                detection.tier
            );
            Resolution::Matched(detection.keyword)
        }
        None => {
            println!("Active target: {}", "none".dimmed());
            Resolution::NoMatch
        }
    };

    println!(
        "Desired profile: {}",
        snapshot.desired_profile(&outcome).green().bold()
    );
    Ok(())
}
