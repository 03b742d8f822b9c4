//! Core types for image transformation.

use crate::error::{Result, RoomVizError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mime type assumed when the model does not label its output.
pub const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// Image formats accepted as transformation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// All accepted formats, in display order.
    pub const ALL: [ImageFormat; 3] = [Self::Png, Self::Jpeg, Self::WebP];

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Looks up a format by its exact MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.mime_type() == mime)
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// File extension for an arbitrary output mime type, `png` when unknown.
pub fn extension_for_mime(mime: &str) -> &'static str {
    ImageFormat::from_mime_type(mime)
        .map(|f| f.extension())
        .unwrap_or("png")
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// The source photo sent along with the prompt.
#[derive(Debug, Clone)]
pub struct InputImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Declared MIME type of `data`.
    pub mime_type: String,
}

/// A request to edit an image with a text instruction.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The instruction text sent to the model.
    pub prompt: String,
    /// Image to transform.
    pub input_image: Option<InputImage>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            input_image: None,
        }
    }

    /// Attaches the image to transform.
    pub fn with_input_image(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.input_image = Some(InputImage {
            data,
            mime_type: mime_type.into(),
        });
        self
    }
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME type reported by the model.
    pub mime_type: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>, metadata: GenerationMetadata) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            metadata,
        }
    }

    /// Builds an image from a base64 payload, as found in inline response data.
    pub fn from_base64(
        data: &str,
        mime_type: Option<&str>,
        metadata: GenerationMetadata,
    ) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| RoomVizError::Decode(e.to_string()))?;
        let mime = mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_MIME);
        Ok(Self::new(bytes, mime, metadata))
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a......"), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(
            ImageFormat::from_mime_type("image/jpeg"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_mime_type("image/gif"), None);
        assert_eq!(ImageFormat::from_mime_type("image/jpg"), None);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/heic"), "png");
    }

    #[test]
    fn test_from_base64_defaults_mime() {
        let image =
            GeneratedImage::from_base64("iVBORw0KGgo=", None, GenerationMetadata::default())
                .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size(), 8);

        let image = GeneratedImage::from_base64(
            "iVBORw0KGgo=",
            Some("image/webp"),
            GenerationMetadata::default(),
        )
        .unwrap();
        assert_eq!(image.mime_type, "image/webp");
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        let err = GeneratedImage::from_base64("not base64!!", None, GenerationMetadata::default())
            .unwrap_err();
        assert!(matches!(err, RoomVizError::Decode(_)));
    }

    #[test]
    fn test_data_url() {
        let image = GeneratedImage::new(vec![1, 2, 3], "image/jpeg", GenerationMetadata::default());
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,AQID");
    }
}
