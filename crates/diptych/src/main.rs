//! Diptych CLI - before/after comparison images for marketing posts.
//!
//! Diptych downloads a "before" product photo and an "after" image, lays them
//! side by side with "ORIGINAL" / "AI GENERATED" badges and a watermark, and
//! writes a single JPEG ready to publish.
//!
//! # Usage
//!
//! ```bash
//! # Compose two existing images
//! diptych compose https://example.com/before.png https://example.com/after.png -o post.jpg
//!
//! # Generate the after image first, then compose
//! diptych generate "a white sneaker on a marble stand" --reference https://example.com/shoe.png
//!
//! # View configuration
//! diptych config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Diptych - before/after comparison images for marketing posts.
#[derive(Parser, Debug)]
#[command(name = "diptych")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a comparison image from two image URLs
    Compose(cli::compose::ComposeArgs),

    /// Generate the after image from a prompt, then compose
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match diptych_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `diptych config path`."
            );
            diptych_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Diptych v{}", diptych_core::VERSION);

    match cli.command {
        Commands::Compose(args) => cli::compose::execute(args, config).await,
        Commands::Generate(args) => cli::generate::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
