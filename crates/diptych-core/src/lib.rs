//! Diptych Core - before/after comparison images for marketing posts.
//!
//! Given a "before" product photo and an "after" image (typically produced by
//! an image-generation service), Diptych builds a single side-by-side JPEG
//! with labeled badges and a watermark.
//!
//! # Architecture
//!
//! ```text
//! URLs → Fetch → Decode → Normalize → Compose → Overlay → Encode → JPEG
//! ```
//!
//! The after-image fixes the unit size `(W, H)`; the output is `(2W, H)`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use diptych_core::{Compositor, Config};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let compositor = Compositor::with_http(Config::load().unwrap_or_default());
//!     let ok = compositor
//!         .create_comparison_image(
//!             "https://example.com/before.png",
//!             "https://example.com/after.png",
//!             Path::new("post.jpg"),
//!             "pikadesign.me",
//!         )
//!         .await;
//!     println!("saved: {ok}");
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, DiptychError, GenerationError, PipelineError, PipelineResult, Result, Stage,
};
pub use generation::{GenerationRequest, HttpImageGenerator, ImageGenerator};
pub use pipeline::{Compositor, FontChain, HttpFetcher, ImageFetcher};
pub use types::{CompositeReport, SourceImage, TargetDimensions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
