//! Config command - inspect and edit the matching, comparison and catalog settings.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use doccmp_core::models::config::DoccmpConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective settings as JSON
    Show {
        /// Print built-in defaults, ignoring any config file
        #[arg(long)]
        defaults: bool,
    },

    /// Write a config file holding the built-in defaults
    Init {
        /// Replace a config file that already exists
        #[arg(long)]
        force: bool,
    },

    /// Print one setting, addressed by a dotted key
    Get {
        /// Dotted key, e.g. "matching.label_threshold" or "comparison.missing_values"
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Dotted key of an existing setting
        key: String,
        /// JSON value; anything that is not valid JSON is stored as a string
        value: String,
    },

    /// Load and validate the config file
    Check,

    /// Print where the config file is read from
    Path,
}

/// Config file location plus load/save with defaults.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn load(&self) -> anyhow::Result<DoccmpConfig> {
        if self.path.exists() {
            Ok(DoccmpConfig::from_file(&self.path)?)
        } else {
            Ok(DoccmpConfig::default())
        }
    }

    fn store(&self, config: &DoccmpConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile {
        path: config_path
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path),
    };

    match args.command {
        ConfigCommand::Show { defaults } => show(&file, defaults),
        ConfigCommand::Init { force } => init(&file, force),
        ConfigCommand::Get { key } => get(&file, &key),
        ConfigCommand::Set { key, value } => set(&file, &key, &value),
        ConfigCommand::Check => check(&file),
        ConfigCommand::Path => path(&file),
    }
}

fn show(file: &ConfigFile, defaults: bool) -> anyhow::Result<()> {
    let config = if defaults {
        DoccmpConfig::default()
    } else {
        if !file.path.exists() {
            eprintln!(
                "{} {} does not exist, using built-in defaults",
                style("ℹ").blue(),
                file.path.display()
            );
        }
        file.load()?
    };

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init(file: &ConfigFile, force: bool) -> anyhow::Result<()> {
    if file.path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            file.path.display()
        );
    }

    file.store(&DoccmpConfig::default())?;
    println!("{} Wrote defaults to {}", style("✓").green(), file.path.display());
    Ok(())
}

fn get(file: &ConfigFile, key: &str) -> anyhow::Result<()> {
    let settings = serde_json::to_value(file.load()?)?;
    let value = lookup(&settings, key)?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set(file: &ConfigFile, key: &str, raw: &str) -> anyhow::Result<()> {
    let value = parse_value(raw);

    let mut settings = serde_json::to_value(file.load()?)?;
    *lookup_mut(&mut settings, key)? = value.clone();

    let config: DoccmpConfig = serde_json::from_value(settings)
        .map_err(|e| anyhow::anyhow!("{} cannot be set to {}: {}", key, value, e))?;
    config.validate()?;

    file.store(&config)?;
    println!("{} {} = {}", style("✓").green(), key, value);
    Ok(())
}

fn check(file: &ConfigFile) -> anyhow::Result<()> {
    if !file.path.exists() {
        anyhow::bail!("{} does not exist", file.path.display());
    }

    let config = DoccmpConfig::from_file(&file.path)?;
    println!(
        "{} {} is valid: label threshold {}, {} document type(s) in the catalog",
        style("✓").green(),
        file.path.display(),
        config.matching.label_threshold,
        config.catalog.entries().len()
    );
    Ok(())
}

fn path(file: &ConfigFile) -> anyhow::Result<()> {
    let status = if file.path.exists() {
        style("present").green()
    } else {
        style("missing, defaults apply (create it with 'doccmp config init')").yellow()
    };
    println!("{} ({})", file.path.display(), status);
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup<'a>(settings: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.')
        .try_fold(settings, |node, part| node.get(part))
        .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))
}

/// Only existing settings can be addressed; new keys are never created.
fn lookup_mut<'a>(settings: &'a mut Value, key: &str) -> anyhow::Result<&'a mut Value> {
    key.split('.')
        .try_fold(settings, |node, part| node.get_mut(part))
        .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))
}
