//! Upload validation.
//!
//! Checks run in a fixed order: missing file, MIME type, size. The first
//! failing check decides the message.

use crate::image::ImageFormat;

/// Largest accepted upload (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME type assumed when the client did not declare one.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Message shown by the form when submitting without a file.
pub const CHOOSE_IMAGE_HINT: &str = "Please choose an image (PNG/JPEG/WEBP, up to 10MB).";

/// Why an upload or option was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No file part, or an empty one.
    #[error("No image uploaded.")]
    MissingFile,

    /// Declared type is not PNG, JPEG or WebP.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Larger than [`MAX_UPLOAD_BYTES`].
    #[error("Image too large (max 10MB).")]
    TooLarge,

    /// Style outside the fixed set.
    #[error("Unsupported style: {0}")]
    UnsupportedStyle(String),

    /// Neither a hex colour nor `no-change`.
    #[error("Unsupported wall color: {0}")]
    UnsupportedWallColor(String),

    /// The form body could not be read.
    #[error("Invalid form submission: {0}")]
    MalformedForm(String),
}

/// A file the user selected, before any checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    /// File contents.
    pub bytes: Vec<u8>,
    /// MIME type declared by the client.
    pub mime_type: String,
}

impl UploadCandidate {
    /// Creates a candidate; a blank MIME type becomes `application/octet-stream`.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            UNKNOWN_MIME.to_string()
        } else {
            mime_type.trim().to_string()
        };
        Self { bytes, mime_type }
    }

    /// Size of the upload in bytes.
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }
}

/// Validates an optional upload, returning the accepted format.
///
/// An empty file counts as missing: browsers send an empty part when the
/// file input was left blank.
pub fn validate(candidate: Option<&UploadCandidate>) -> Result<ImageFormat, ValidationError> {
    let candidate = candidate
        .filter(|c| c.byte_length() > 0)
        .ok_or(ValidationError::MissingFile)?;

    let format = ImageFormat::from_mime_type(&candidate.mime_type)
        .ok_or_else(|| ValidationError::UnsupportedType(candidate.mime_type.clone()))?;

    if candidate.byte_length() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge);
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(len: usize, mime: &str) -> UploadCandidate {
        UploadCandidate::new(vec![0u8; len], mime)
    }

    #[test]
    fn test_accepts_allowed_types() {
        for (mime, format) in [
            ("image/png", ImageFormat::Png),
            ("image/jpeg", ImageFormat::Jpeg),
            ("image/webp", ImageFormat::WebP),
        ] {
            assert_eq!(validate(Some(&candidate(1024, mime))), Ok(format));
        }
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(validate(None), Err(ValidationError::MissingFile));
        assert_eq!(
            validate(Some(&candidate(0, "image/png"))),
            Err(ValidationError::MissingFile)
        );
    }

    #[test]
    fn test_rejects_other_types_naming_them() {
        for mime in ["image/gif", "image/svg+xml", "application/pdf", "image/heic"] {
            let err = validate(Some(&candidate(10, mime))).unwrap_err();
            assert!(err.to_string().contains(mime), "{err}");
        }
    }

    #[test]
    fn test_blank_mime_is_octet_stream() {
        let err = validate(Some(&candidate(10, ""))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type: application/octet-stream"
        );
    }

    #[test]
    fn test_size_limit() {
        assert_eq!(
            validate(Some(&candidate(MAX_UPLOAD_BYTES, "image/jpeg"))),
            Ok(ImageFormat::Jpeg)
        );
        let err = validate(Some(&candidate(MAX_UPLOAD_BYTES + 1, "image/png"))).unwrap_err();
        assert_eq!(err, ValidationError::TooLarge);
        assert_eq!(err.to_string(), "Image too large (max 10MB).");
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = validate(Some(&candidate(MAX_UPLOAD_BYTES + 1, "image/gif"))).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedType("image/gif".into()));
    }
}
