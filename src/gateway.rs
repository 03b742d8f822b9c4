//! Transformation gateway: validate, prompt, call the model once, report.
//!
//! Nothing escapes [`TransformGateway::transform`] as an error; every
//! failure is folded into [`TransformResult::Failure`] so callers always
//! get a displayable outcome.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{ErrorKind, Result, RoomVizError};
use crate::image::providers::GeminiProvider;
use crate::image::{GeneratedImage, GenerationRequest, ImageProvider};
use crate::renovation::{
    validate, InteriorStyle, TransformOptions, UploadCandidate, ValidationError, WallColor,
};

/// Reason shown when an upstream error carries no message.
const GENERIC_FAILURE: &str = "Unknown error";

/// Reported on every call when no credential was configured.
const MISSING_CREDENTIAL: &str = "Missing GEMINI_API_KEY env var.";

/// A successful transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSuccess {
    /// The regenerated photo.
    pub image: GeneratedImage,
    /// Options the image was produced with.
    pub options: TransformOptions,
}

impl TransformSuccess {
    /// Suggested download filename.
    pub fn download_filename(&self) -> String {
        self.options.download_filename(&self.image.mime_type)
    }
}

/// A failed transformation with a user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailure {
    /// Taxonomy bucket.
    pub kind: ErrorKind,
    /// Human readable message.
    pub reason: String,
}

impl From<RoomVizError> for TransformFailure {
    fn from(err: RoomVizError) -> Self {
        let reason = err.to_string();
        let reason = if reason.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            reason
        };
        Self {
            kind: err.kind(),
            reason,
        }
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformResult {
    /// The model returned an image.
    Success(TransformSuccess),
    /// Rejected locally or failed upstream.
    Failure(TransformFailure),
}

impl TransformResult {
    /// Returns true for [`TransformResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Failure reason, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(&f.reason),
        }
    }
}

impl From<Result<TransformSuccess>> for TransformResult {
    fn from(result: Result<TransformSuccess>) -> Self {
        match result {
            Ok(success) => Self::Success(success),
            Err(err) => Self::Failure(err.into()),
        }
    }
}

/// Raw form values, before option parsing.
#[derive(Debug, Clone, Default)]
pub struct TransformInput {
    /// The uploaded file, if any.
    pub upload: Option<UploadCandidate>,
    /// `style` field as sent.
    pub style: Option<String>,
    /// `wallColor` field as sent.
    pub wall_color: Option<String>,
}

/// Wraps the image model behind a single infallible call.
///
/// Holds no per-request state; concurrent calls are independent.
#[derive(Clone)]
pub struct TransformGateway {
    provider: Option<Arc<dyn ImageProvider>>,
    default_wall_color: WallColor,
}

impl TransformGateway {
    /// Builds the gateway from configuration.
    ///
    /// A missing credential does not fail here: every later call reports it
    /// without touching the network.
    pub fn from_config(config: &Config) -> Self {
        let provider = config.api_key.as_ref().and_then(|key| {
            GeminiProvider::builder()
                .api_key(key)
                .model(config.model)
                .base_url(&config.base_url)
                .build()
                .map_err(|e| tracing::warn!("Gemini provider unavailable: {e}"))
                .ok()
        });

        Self {
            provider: provider.map(|p| Arc::new(p) as Arc<dyn ImageProvider>),
            default_wall_color: config.default_wall_color.clone(),
        }
    }

    /// Builds a gateway around an existing provider.
    pub fn with_provider(provider: Arc<dyn ImageProvider>) -> Self {
        Self {
            provider: Some(provider),
            default_wall_color: WallColor::NoChange,
        }
    }

    /// Sets the wall colour used when the form omits it.
    pub fn default_wall_color(mut self, color: WallColor) -> Self {
        self.default_wall_color = color;
        self
    }

    /// Returns true if a provider (and thus a credential) is available.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Checks provider reachability.
    pub async fn health_check(&self) -> Result<()> {
        self.provider()?.health_check().await
    }

    /// Transforms raw form input: configuration, file, then options.
    pub async fn transform_input(&self, input: TransformInput) -> TransformResult {
        self.try_transform_input(input).await.into()
    }

    /// Transforms an upload with already-parsed options.
    pub async fn transform(
        &self,
        upload: Option<&UploadCandidate>,
        options: &TransformOptions,
    ) -> TransformResult {
        self.try_transform(upload, options).await.into()
    }

    async fn try_transform_input(&self, input: TransformInput) -> Result<TransformSuccess> {
        self.provider()?;
        validate(input.upload.as_ref())?;

        let style = InteriorStyle::parse_or_default(input.style.as_deref())?;
        let wall_color = WallColor::parse_or(input.wall_color.as_deref(), &self.default_wall_color)?;
        let options = TransformOptions::new(style, wall_color);

        self.try_transform(input.upload.as_ref(), &options).await
    }

    async fn try_transform(
        &self,
        upload: Option<&UploadCandidate>,
        options: &TransformOptions,
    ) -> Result<TransformSuccess> {
        let provider = self.provider()?;
        let upload = upload.ok_or(ValidationError::MissingFile)?;
        let format = validate(Some(upload))?;

        let request = GenerationRequest::new(options.prompt())
            .with_input_image(upload.bytes.clone(), format.mime_type());

        tracing::info!(
            style = %options.style,
            wall_color = %options.wall_color,
            input_bytes = upload.byte_length(),
            provider = provider.name(),
            "transforming room photo"
        );

        match provider.generate(&request).await {
            Ok(image) => {
                tracing::info!(
                    mime_type = %image.mime_type,
                    output_bytes = image.size(),
                    duration_ms = image.metadata.duration_ms,
                    "transformation complete"
                );
                Ok(TransformSuccess {
                    image,
                    options: options.clone(),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "transformation failed");
                Err(e)
            }
        }
    }

    fn provider(&self) -> Result<&dyn ImageProvider> {
        self.provider
            .as_deref()
            .ok_or_else(|| RoomVizError::Config(MISSING_CREDENTIAL.into()))
    }
}
