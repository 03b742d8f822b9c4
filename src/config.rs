//! Process configuration.
//!
//! | Variable             | Default                                     |
//! |----------------------|---------------------------------------------|
//! | `GEMINI_API_KEY`     | falls back to `GOOGLE_API_KEY`, else unset  |
//! | `GEMINI_MODEL`       | `nano-banana` (`gemini-2.5-flash-image`)    |
//! | `GEMINI_BASE_URL`    | `https://generativelanguage.googleapis.com` |
//! | `BIND_ADDR`          | `127.0.0.1:3000`                            |
//! | `DEFAULT_WALL_COLOR` | `no-change`                                 |
//! | `MAX_BODY_BYTES`     | 25 MiB                                      |
//!
//! A missing key is not an error here; the gateway reports it per request.

use std::net::SocketAddr;

use crate::image::providers::{GeminiModel, DEFAULT_GEMINI_BASE_URL};
use crate::renovation::{WallColor, MAX_UPLOAD_BYTES};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default HTTP body limit; above the upload cap so oversized files reach validation.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Runtime configuration, injected into the gateway and server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API credential.
    pub api_key: Option<String>,
    /// Model variant.
    pub model: GeminiModel,
    /// API endpoint.
    pub base_url: String,
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// Wall colour used when the form omits the field.
    pub default_wall_color: WallColor,
    /// HTTP request body limit.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_wall_color: WallColor::NoChange,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Loads configuration from the environment (and `.env` if present).
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY"));

        let model = non_empty("GEMINI_MODEL")
            .and_then(|v| {
                v.parse::<GeminiModel>()
                    .map_err(|e| tracing::warn!("{e}, using default model"))
                    .ok()
            })
            .unwrap_or(defaults.model);

        let bind_addr = non_empty("BIND_ADDR")
            .and_then(|v| {
                v.trim()
                    .parse::<SocketAddr>()
                    .map_err(|e| tracing::warn!(value = %v, "invalid BIND_ADDR: {e}"))
                    .ok()
            })
            .unwrap_or(defaults.bind_addr);

        let default_wall_color = non_empty("DEFAULT_WALL_COLOR")
            .and_then(|v| {
                v.parse::<WallColor>()
                    .map_err(|e| tracing::warn!("invalid DEFAULT_WALL_COLOR: {e}"))
                    .ok()
            })
            .unwrap_or(defaults.default_wall_color);

        let max_body_bytes = non_empty("MAX_BODY_BYTES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|v| v.max(MAX_UPLOAD_BYTES + 1024 * 1024))
            .unwrap_or(defaults.max_body_bytes);

        Self {
            api_key,
            model,
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            bind_addr,
            default_wall_color,
            max_body_bytes,
        }
    }

    /// Sets the API key (used by tests and the CLI).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Points the provider at another endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Returns true if a credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
