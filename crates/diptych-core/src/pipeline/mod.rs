//! Compositing pipeline components.
//!
//! Stages run strictly in order; the first failure aborts the run:
//! - **fetch**: Download source images
//! - **decode**: Decode bytes into RGB pixel buffers
//! - **normalize**: Stretch the before-image to the after-image's size
//! - **compose**: Lay both images side by side with a divider
//! - **font**: Resolve fonts and rasterize text
//! - **overlay**: Draw the badges and watermark
//! - **encode**: Write the final JPEG
//! - **processor**: Orchestrates the full pipeline

pub mod compose;
pub mod decode;
pub mod encode;
pub mod fetch;
pub mod font;
pub mod normalize;
pub mod overlay;
pub mod processor;

// Re-exports for convenient access
pub use decode::ImageDecoder;
pub use fetch::{HttpFetcher, ImageFetcher};
pub use font::{BuiltinFont, FileFont, FontChain, FontStrategy};
pub use processor::{Compositor, RenderedComparison};
