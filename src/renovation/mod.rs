//! Request validation and prompt construction.
//!
//! Everything here is pure: no I/O, no configuration lookups.

mod options;
mod prompt;
mod validate;

pub use options::{InteriorStyle, Swatch, TransformOptions, WallColor, NO_CHANGE, PALETTE};
pub use prompt::build_prompt;
pub use validate::{
    validate, UploadCandidate, ValidationError, CHOOSE_IMAGE_HINT, MAX_UPLOAD_BYTES, UNKNOWN_MIME,
};
