//! The `diptych compose` command.

use anyhow::Context;
use clap::Args;
use diptych_core::{CompositeReport, Compositor, Config};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Arguments for the `compose` command.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// URL of the "before" image (left half)
    pub before: String,

    /// URL of the "after" image (right half, fixes the output size)
    pub after: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output options shared by `compose` and `generate`.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output JPEG path (defaults to <output.dir>/post_<timestamp>.jpg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Watermark text (empty string disables it)
    #[arg(long)]
    pub watermark: Option<String>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Print the result report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the compose command.
pub async fn execute(args: ComposeArgs, config: Config) -> anyhow::Result<()> {
    let report = compose_urls(&args.before, &args.after, &args.output, config).await?;
    print_report(&report, args.output.json)
}

/// Compose two URLs into a JPEG, honoring the shared output options.
pub async fn compose_urls(
    before: &str,
    after: &str,
    opts: &OutputArgs,
    mut config: Config,
) -> anyhow::Result<CompositeReport> {
    if let Some(quality) = opts.quality {
        config.output.jpeg_quality = quality;
    }
    let watermark = opts
        .watermark
        .clone()
        .unwrap_or_else(|| config.output.watermark.clone());
    let output_path = resolve_output_path(opts.output.as_deref(), &config)?;

    let compositor = Compositor::with_http(config);
    let spinner = create_spinner("Composing comparison image...");
    let result = compositor
        .compose_to_file(before, after, &output_path, &watermark)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            tracing::info!(
                "Saved comparison to {:?} ({}, {} bytes, {}ms)",
                report.output_path,
                report.canvas_size,
                report.bytes_written,
                report.elapsed_ms
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), "Comparison image failed: {e}");
            anyhow::bail!("failed to create comparison image ({} stage): {e}", e.stage())
        }
    }
}

/// Pick the output path: an explicit `-o` wins, otherwise a timestamped
/// file inside the configured output directory (created on demand).
fn resolve_output_path(explicit: Option<&Path>, config: &Config) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        return Ok(PathBuf::from(expanded));
    }

    let dir = config.output_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(dir.join(default_file_name(ts)))
}

fn default_file_name(unix_ts: u64) -> String {
    format!("post_{unix_ts}.jpg")
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_report(report: &CompositeReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} ({}, {} bytes)",
            report.output_path.display(),
            report.canvas_size,
            report.bytes_written
        );
    }
    Ok(())
}
