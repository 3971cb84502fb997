//! Client for the upstream image-generation service.
//!
//! The service turns a prompt plus a reference product photo into the
//! "after" image that the compositor places on the right-hand side.

pub(crate) mod http;
pub(crate) mod provider;

pub use http::HttpImageGenerator;
pub use provider::{
    resolve_env_var, GenerationRequest, GenerationResponse, GenerationSettings, ImageGenerator,
};
