//! The shared generation contract.
//!
//! Everything both upstream styles have in common lives here: the inbound
//! request body, the resolved task handed to a provider, the normalized
//! outcome, the error taxonomy, and the [`ImageModel`] trait the providers
//! implement. Providers translate between this contract and their own wire
//! formats; nothing outside `providers/` should know which upstream is in
//! play.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ================================================================
// Errors
// ================================================================

#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key on the request and none configured server-side.
    #[error("missing credential: pass apiKey in the request or configure a server-side key")]
    MissingCredential,

    /// The selected workflow needs a prompt and none was given.
    #[error("missing prompt")]
    MissingPrompt,

    /// The request violates a catalog rule (image counts, unknown feature).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Http error (e.g.: connection error, timeout, etc.)
    #[error("HttpError: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Json error (e.g.: serialization, deserialization)
    #[error("JsonError: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Non-2xx reply from the upstream; `message` carries the raw body text.
    #[error("upstream error {status}: {message}")]
    UpstreamHttp { status: u16, message: String },

    /// The upstream replied 2xx but produced no image part. Any text it did
    /// return rides along, refusals usually explain themselves there.
    #[error("no image returned{}", .text.as_ref().map(|t| format!(": {t}")).unwrap_or_default())]
    NoImageReturned { text: Option<String> },

    /// Catch-all for failures that must not reach the caller verbatim.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl GenerationError {
    /// True for failures the caller caused. These are rejected before any
    /// outbound call and map to a 400 at the HTTP boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::MissingPrompt | Self::InvalidRequest(_)
        )
    }

    /// Message safe to hand back to the caller. Transport errors embed the
    /// request URL, which for the direct API carries the key as a query
    /// parameter, so they are reported generically; the full detail goes to
    /// the log sink instead.
    pub fn client_message(&self) -> String {
        match self {
            Self::HttpError(_) => "upstream request failed".to_string(),
            Self::Unexpected(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

// ================================================================
// Request types
// ================================================================

/// Aspect ratios the image models accept, serialized as the literal ratio.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait2x3 => "2:3",
            Self::Landscape3x2 => "3:2",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait4x5 => "4:5",
            Self::Landscape5x4 => "5:4",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
            Self::Ultrawide21x9 => "21:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output resolution tier, serialized as `1K` / `2K` / `4K`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional per-request tuning, camelCase on the wire.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub aspect_ratio: Option<AspectRatio>,
    /// `resolution` is accepted as an inbound alias for older clients.
    #[serde(alias = "resolution")]
    pub image_size: Option<ImageSize>,
    pub use_google_search: bool,
}

/// The inbound body of a generate call.
///
/// Unknown fields are ignored; absent fields take their defaults so a bare
/// `{"prompt": "..."}` is a complete request.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Base64 payloads of reference images, passed through untouched.
    pub images: Vec<String>,
    pub config: Option<GenerationConfig>,
    pub feature_id: Option<String>,
    /// Style keywords prefixed onto the prompt. Older clients send this
    /// list under `features`.
    #[serde(alias = "features")]
    pub styles: Vec<String>,
    /// Per-request credential, overriding the server-side key.
    pub api_key: Option<String>,
}

/// A fully resolved generation task, as handed to a provider.
///
/// Defaults are applied before this type exists: providers always send a
/// concrete aspect ratio and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub images: Vec<String>,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub google_search: bool,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            aspect_ratio: AspectRatio::default(),
            image_size: ImageSize::default(),
            google_search: false,
        }
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn google_search(mut self, enabled: bool) -> Self {
        self.google_search = enabled;
        self
    }
}

// ================================================================
// Results
// ================================================================

/// The normalized outcome of a generation call: the first inline image the
/// upstream returned, plus the first text part if the model captioned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Base64 of the generated image, exactly as the upstream sent it.
    pub image_data: String,
    pub text: Option<String>,
}

/// Prefixes style keywords onto a prompt: `keyword1, keyword2, ..., prompt`.
///
/// The join is byte-exact and order-preserving so identical inputs always
/// compose to the identical upstream prompt. An empty keyword list returns
/// the prompt untouched.
pub fn compose_prompt<S: AsRef<str>>(keywords: &[S], prompt: &str) -> String {
    if keywords.is_empty() {
        return prompt.to_string();
    }
    let joined = keywords
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{joined}, {prompt}")
}

/// The seam both upstream styles implement.
pub trait ImageModel: Clone + Send + Sync {
    /// Runs one generation task and normalizes the upstream reply.
    ///
    /// Exactly one outbound call per invocation: no retries, no caching.
    /// Non-2xx replies surface as [`GenerationError::UpstreamHttp`] with the
    /// raw body text; a 2xx reply without an image part surfaces as
    /// [`GenerationError::NoImageReturned`].
    fn generate(
        &self,
        request: ImageRequest,
    ) -> impl std::future::Future<Output = Result<Generation, GenerationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn composes_keywords_before_prompt() {
        let composed = compose_prompt(&["cyberpunk", "neon"], "a cat");
        assert_eq!(composed, "cyberpunk, neon, a cat");
    }

    #[test]
    fn compose_without_keywords_is_verbatim() {
        assert_eq!(compose_prompt::<&str>(&[], "a cat"), "a cat");
    }

    #[test]
    fn compose_with_single_keyword() {
        assert_eq!(compose_prompt(&["watercolor"], "a cat"), "watercolor, a cat");
    }

    #[test]
    fn compose_preserves_inner_whitespace() {
        let composed = compose_prompt(&["bold text"], "  spaced  prompt ");
        assert_eq!(composed, "bold text,   spaced  prompt ");
    }

    #[test]
    fn aspect_ratio_serializes_as_ratio_string() {
        let value = serde_json::to_value(AspectRatio::Landscape16x9).unwrap();
        assert_eq!(value, json!("16:9"));

        let parsed: AspectRatio = serde_json::from_value(json!("21:9")).unwrap();
        assert_eq!(parsed, AspectRatio::Ultrawide21x9);
    }

    #[test]
    fn unknown_aspect_ratio_is_rejected() {
        assert!(serde_json::from_value::<AspectRatio>(json!("7:5")).is_err());
    }

    #[test]
    fn image_size_round_trips() {
        assert_eq!(serde_json::to_value(ImageSize::FourK).unwrap(), json!("4K"));
        let parsed: ImageSize = serde_json::from_value(json!("2K")).unwrap();
        assert_eq!(parsed, ImageSize::TwoK);
    }

    #[test]
    fn request_accepts_camel_case_and_aliases() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "prompt": "a cat",
            "featureId": "text-to-image",
            "apiKey": "k",
            "features": ["cyberpunk", "neon"],
            "config": { "resolution": "2K", "aspectRatio": "9:16" }
        }))
        .unwrap();

        assert_eq!(request.feature_id.as_deref(), Some("text-to-image"));
        assert_eq!(request.api_key.as_deref(), Some("k"));
        assert_eq!(request.styles, vec!["cyberpunk", "neon"]);
        let config = request.config.unwrap();
        assert_eq!(config.image_size, Some(ImageSize::TwoK));
        assert_eq!(config.aspect_ratio, Some(AspectRatio::Portrait9x16));
    }

    #[test]
    fn bare_prompt_is_a_complete_request() {
        let request: GenerationRequest =
            serde_json::from_value(json!({ "prompt": "a cat" })).unwrap();
        assert!(request.images.is_empty());
        assert!(request.styles.is_empty());
        assert!(request.config.is_none());
        assert!(request.feature_id.is_none());
        assert!(request.api_key.is_none());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "prompt": "a cat",
            "somethingNew": true
        }))
        .unwrap();
        assert_eq!(request.prompt, "a cat");
    }

    #[test]
    fn client_errors_are_flagged() {
        assert!(GenerationError::MissingCredential.is_client_error());
        assert!(GenerationError::MissingPrompt.is_client_error());
        assert!(GenerationError::InvalidRequest("x".into()).is_client_error());
        assert!(
            !GenerationError::UpstreamHttp {
                status: 429,
                message: "rate limited".into()
            }
            .is_client_error()
        );
        assert!(!GenerationError::NoImageReturned { text: None }.is_client_error());
    }

    #[test]
    fn no_image_error_carries_upstream_text() {
        let error = GenerationError::NoImageReturned {
            text: Some("cannot help with that".into()),
        };
        assert_eq!(
            error.to_string(),
            "no image returned: cannot help with that"
        );
        assert_eq!(
            GenerationError::NoImageReturned { text: None }.to_string(),
            "no image returned"
        );
    }
}
