#![warn(missing_docs)]
//! RoomViz - photorealistic renovation previews of room photos.
//!
//! A user uploads a photo of a room, picks an interior style and optionally
//! a wall colour, and receives an AI-generated image of the same room
//! renovated in that style. The layout (doors, windows, walls, ceiling
//! height) is kept; surfaces, furniture and lighting are replaced.
//!
//! # Quick Start
//!
//! ```no_run
//! use roomviz::{Config, InteriorStyle, TransformGateway, TransformOptions, UploadCandidate, WallColor};
//!
//! #[tokio::main]
//! async fn main() -> roomviz::Result<()> {
//!     let config = Config::from_env();
//!     let gateway = TransformGateway::from_config(&config);
//!
//!     let upload = UploadCandidate::new(std::fs::read("living-room.jpg")?, "image/jpeg");
//!     let options = TransformOptions::new(InteriorStyle::Scandinavian, "#F5F5DC".parse()?);
//!
//!     match gateway.transform(Some(&upload), &options).await {
//!         roomviz::TransformResult::Success(done) => done.image.save(done.download_filename())?,
//!         roomviz::TransformResult::Failure(failure) => eprintln!("{}", failure.reason),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Serving the web form
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> roomviz::Result<()> {
//!     roomviz::logger::init_logger("info");
//!     roomviz::server::serve(roomviz::Config::from_env()).await
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `roomviz` binary (`serve`, `transform`, `styles`, `check`)

pub mod config;
mod error;
pub mod gateway;
pub mod image;
pub mod logger;
pub mod renovation;
pub mod server;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export error types at crate root
pub use error::{ErrorKind, Result, RoomVizError};

pub use config::Config;
pub use gateway::{TransformFailure, TransformGateway, TransformInput, TransformResult, TransformSuccess};
pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use image::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ImageProvider};
pub use renovation::{
    build_prompt, validate, InteriorStyle, TransformOptions, UploadCandidate, ValidationError, WallColor,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorKind, Result, RoomVizError};
    pub use crate::gateway::{TransformGateway, TransformResult};
    pub use crate::image::{GeneratedImage, GenerationRequest, ImageProvider};
    pub use crate::renovation::{InteriorStyle, TransformOptions, UploadCandidate, WallColor};
}
