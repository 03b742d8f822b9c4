//! Image transformation module.

mod provider;
pub mod providers;
mod types;

pub use provider::ImageProvider;
pub use types::{
    extension_for_mime, GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat,
    InputImage, DEFAULT_OUTPUT_MIME,
};
