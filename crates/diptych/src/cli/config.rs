//! The `diptych config` command: inspect the effective configuration and
//! what it resolves to on this machine.

use clap::{Args, Subcommand};
use diptych_core::generation::resolve_env_var;
use diptych_core::{Config, FontChain};
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the configuration plus the font, secret and output directory
    /// it resolves to
    Show,

    /// Show the config file path and whether it exists
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
            // Comments keep the output loadable as TOML.
            println!("# Resolved on this machine:");
            for (key, value) in resolved_settings(&config) {
                println!("# {key} = {value}");
            }
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file not present; built-in defaults are in use)");
            }
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());

            let config = Config::default();
            println!("Labels will render with: {}", font_in_use(&config));
            if resolve_env_var(&config.generation.secret).is_none() {
                println!("generation.secret: {}", secret_status(&config.generation.secret));
            }
        }
    }

    Ok(())
}

/// What the config turns into at runtime, as `(key, value)` pairs.
fn resolved_settings(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("font", font_in_use(config)),
        ("generation.secret", secret_status(&config.generation.secret)),
        ("output.dir", config.output_dir().display().to_string()),
    ]
}

/// The first font in the chain that actually loads.
fn font_in_use(config: &Config) -> String {
    FontChain::from_config(config).resolve().0
}

/// "set", or how to set it. Never echoes the secret itself.
fn secret_status(secret: &str) -> String {
    if resolve_env_var(secret).is_some() {
        return "set".to_string();
    }
    match secret
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var) => format!("missing (export {var})"),
        None => "missing".to_string(),
    }
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_in_use_falls_back_to_builtin() {
        let mut config = Config::default();
        config.fonts.search_paths = vec!["/no/such/font.ttf".to_string()];
        assert_eq!(font_in_use(&config), "builtin-5x7");
    }

    #[test]
    fn test_font_in_use_reports_loadable_file() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../diptych-core/tests/fixtures/fonts/DejaVuSans-Bold.ttf"
        );
        let mut config = Config::default();
        config.fonts.search_paths = vec!["/no/such/font.ttf".to_string(), path.to_string()];
        assert!(font_in_use(&config).ends_with("DejaVuSans-Bold.ttf"));
    }

    #[test]
    fn test_secret_status_never_echoes_value() {
        assert_eq!(secret_status("hunter2"), "set");
        assert_eq!(
            secret_status("${DIPTYCH_TEST_UNSET_SECRET_91}"),
            "missing (export DIPTYCH_TEST_UNSET_SECRET_91)"
        );
        assert_eq!(secret_status(""), "missing");
    }

    #[test]
    fn test_resolved_settings_keys() {
        let keys: Vec<_> = resolved_settings(&Config::default())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["font", "generation.secret", "output.dir"]);
    }

    #[test]
    fn test_write_default_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.jpeg_quality, 95);

        assert!(write_default(&path, false).is_err());
        write_default(&path, true).unwrap();
    }
}
