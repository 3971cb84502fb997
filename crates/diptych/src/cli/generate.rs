//! The `diptych generate` command: request an "after" image from the
//! generation service, then compose it next to the reference.

use clap::Args;
use diptych_core::{Config, GenerationRequest, HttpImageGenerator, ImageGenerator};

use super::compose::{compose_urls, print_report, OutputArgs};

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Product idea; the configured prompt suffix is appended
    pub idea: String,

    /// Reference image URL (used as the "before" half)
    #[arg(short, long)]
    pub reference: String,

    /// Send the idea as-is, without the prompt suffix
    #[arg(long)]
    pub raw_prompt: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, config: Config) -> anyhow::Result<()> {
    let generator = HttpImageGenerator::from_config(&config.generation)?;
    let request = if args.raw_prompt {
        GenerationRequest::new(&args.idea, &args.reference, &config.generation)
    } else {
        GenerationRequest::from_idea(&args.idea, &args.reference, &config.generation)
    };

    tracing::info!("Generating with {} ({:?} timeout)", generator.name(), generator.timeout());
    let generated = generator.generate(&request).await?;
    tracing::info!("Generation finished in {}ms", generated.latency_ms);

    let report = compose_urls(&args.reference, &generated.image_url, &args.output, config).await?;
    print_report(&report, args.output.json)
}
