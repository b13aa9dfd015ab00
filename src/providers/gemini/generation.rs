use serde::{Deserialize, Serialize};

use super::client::Client;
use crate::generation::{self, AspectRatio, Generation, GenerationError, ImageRequest, ImageSize};

// ================================================================
// Gemini Image Generation API
// ================================================================
/// The `gemini-2.5-flash-image-preview` model ("Nano Banana").
pub const GEMINI_2_5_FLASH_IMAGE: &str = "gemini-2.5-flash-image-preview";
/// The `gemini-3-pro-image-preview` model.
pub const GEMINI_3_PRO_IMAGE: &str = "gemini-3-pro-image-preview";

/// Reference images are attached under a fixed mime type; the upstream
/// sniffs the real encoding itself.
const IMAGE_MIME_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct ImageModel {
    client: Client,
    /// Name of the model (e.g.: gemini-2.5-flash-image-preview)
    pub model: String,
}

impl ImageModel {
    pub fn new(client: Client, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn create_request(&self, request: &ImageRequest) -> GenerateContentRequest {
        let mut parts = Vec::new();
        if !request.prompt.trim().is_empty() {
            parts.push(Part::Text(request.prompt.clone()));
        }
        for data in &request.images {
            parts.push(Part::InlineData(InlineData {
                mime_type: IMAGE_MIME_TYPE.to_string(),
                data: data.clone(),
            }));
        }

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio,
                    image_size: request.image_size,
                },
                ..Default::default()
            },
            tools: request.google_search.then(|| {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            }),
        }
    }
}

impl generation::ImageModel for ImageModel {
    async fn generate(&self, request: ImageRequest) -> Result<Generation, GenerationError> {
        let body = self.create_request(&request);

        let response = self
            .client
            .post(&format!("v1beta/models/{}:generateContent", self.model))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::UpstreamHttp { status, message });
        }

        let text = response.text().await?;
        let response: GenerateContentResponse = serde_json::from_str(&text)?;
        response.try_into()
    }
}

// ================================================================
// Wire format
// ================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A single piece of user content: prompt text or an inline image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 image payload, passed through untouched in both directions.
    pub data: String,
}

/// Subset of the upstream `generationConfig` this gateway drives. Sampling
/// knobs stay unset unless a caller of the library fills them in.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    pub response_modalities: Vec<Modality>,
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Image,
    Text,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response parts arrive as loose objects; models sometimes attach extra
/// keys (thought signatures and the like), so each known field is optional
/// and the rest are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

impl TryFrom<GenerateContentResponse> for Generation {
    type Error = GenerationError;

    fn try_from(response: GenerateContentResponse) -> Result<Self, Self::Error> {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        let mut image_data: Option<String> = None;
        let mut text: Option<String> = None;
        for part in parts {
            if let Some(inline) = part.inline_data {
                if image_data.is_none() {
                    image_data = Some(inline.data);
                }
            }
            if let Some(caption) = part.text {
                if text.is_none() && !caption.is_empty() {
                    text = Some(caption);
                }
            }
        }

        match image_data {
            Some(image_data) => Ok(Generation { image_data, text }),
            None => Err(GenerationError::NoImageReturned { text }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> ImageModel {
        let client = Client::builder("test-key").build().unwrap();
        client.image_model(GEMINI_2_5_FLASH_IMAGE)
    }

    #[test]
    fn serializes_prompt_only_request() {
        let request = ImageRequest::new("cyberpunk, neon, a cat");
        let body = model().create_request(&request);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "cyberpunk, neon, a cat" }]
                }],
                "generationConfig": {
                    "responseModalities": ["IMAGE", "TEXT"],
                    "imageConfig": { "aspectRatio": "1:1", "imageSize": "1K" }
                }
            })
        );
    }

    #[test]
    fn attaches_images_as_inline_data() {
        let request = ImageRequest::new("merge these")
            .images(vec!["QUFBQQ==".to_string(), "QkJCQg==".to_string()])
            .aspect_ratio(AspectRatio::Landscape16x9)
            .image_size(ImageSize::FourK);
        let body = model().create_request(&request);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "merge these" },
                        { "inlineData": { "mimeType": "image/png", "data": "QUFBQQ==" } },
                        { "inlineData": { "mimeType": "image/png", "data": "QkJCQg==" } }
                    ]
                }],
                "generationConfig": {
                    "responseModalities": ["IMAGE", "TEXT"],
                    "imageConfig": { "aspectRatio": "16:9", "imageSize": "4K" }
                }
            })
        );
    }

    #[test]
    fn google_search_adds_the_tool() {
        let request = ImageRequest::new("current weather poster").google_search(true);
        let body = serde_json::to_value(model().create_request(&request)).unwrap();
        assert_eq!(
            body.get("tools").unwrap(),
            &json!([{ "google_search": {} }])
        );
    }

    #[test]
    fn blank_prompt_sends_images_only() {
        let request = ImageRequest::new("   ").images(vec!["QUFBQQ==".to_string()]);
        let body = serde_json::to_value(model().create_request(&request)).unwrap();
        let parts = body
            .pointer("/contents/0/parts")
            .and_then(|parts| parts.as_array())
            .unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts.first().unwrap().get("inlineData").is_some());
    }

    #[test]
    fn parses_inline_image_and_caption() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                        { "text": "done" }
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let generation = Generation::try_from(response).unwrap();
        assert_eq!(generation.image_data, "AAAA");
        assert_eq!(generation.text.as_deref(), Some("done"));
    }

    #[test]
    fn first_image_part_wins() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "Rk9P" } },
                    { "inlineData": { "mimeType": "image/png", "data": "QkFS" } }
                ]}
            }]
        }))
        .unwrap();

        let generation = Generation::try_from(response).unwrap();
        assert_eq!(generation.image_data, "Rk9P");
        assert!(generation.text.is_none());
    }

    #[test]
    fn text_only_reply_is_a_no_image_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I cannot draw that" }] }
            }]
        }))
        .unwrap();

        match Generation::try_from(response) {
            Err(GenerationError::NoImageReturned { text }) => {
                assert_eq!(text.as_deref(), Some("I cannot draw that"));
            }
            other => panic!("expected NoImageReturned, got {other:?}"),
        }
    }

    #[test]
    fn empty_candidates_is_a_no_image_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            Generation::try_from(response),
            Err(GenerationError::NoImageReturned { text: None })
        ));
    }

    #[test]
    fn unknown_part_fields_are_ignored() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "thoughtSignature": "opaque" },
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" }, "extra": 1 }
                ]}
            }]
        }))
        .unwrap();

        let generation = Generation::try_from(response).unwrap();
        assert_eq!(generation.image_data, "AAAA");
    }
}
