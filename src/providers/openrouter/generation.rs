use serde::{Deserialize, Serialize};

use super::client::Client;
use crate::generation::{self, AspectRatio, Generation, GenerationError, ImageRequest, ImageSize};

// ================================================================
// OpenRouter Image Generation API
// ================================================================
/// The `gemini-2.5-flash-image-preview` model ("Nano Banana"), routed
/// through OpenRouter.
pub const GEMINI_2_5_FLASH_IMAGE: &str = "google/gemini-2.5-flash-image-preview";
/// The `gemini-3-pro-image-preview` model, routed through OpenRouter.
pub const GEMINI_3_PRO_IMAGE: &str = "google/gemini-3-pro-image-preview";

#[derive(Clone)]
pub struct ImageModel {
    client: Client,
    /// Name of the model (e.g.: google/gemini-2.5-flash-image-preview)
    pub model: String,
}

impl ImageModel {
    pub fn new(client: Client, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn create_request(&self, request: &ImageRequest) -> ChatCompletionRequest {
        // A bare string for prompt-only calls, a part array once reference
        // images are attached.
        let content = if request.images.is_empty() {
            MessageContent::Text(request.prompt.clone())
        } else {
            let mut parts = Vec::new();
            if !request.prompt.trim().is_empty() {
                parts.push(ContentPart::Text {
                    text: request.prompt.clone(),
                });
            }
            parts.extend(request.images.iter().map(|data| ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/png;base64,{data}"),
                },
            }));
            MessageContent::Parts(parts)
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content,
            }],
            modalities: vec![Modality::Image, Modality::Text],
            image_config: ImageConfig {
                aspect_ratio: request.aspect_ratio,
                image_size: request.image_size,
            },
        }
    }
}

impl generation::ImageModel for ImageModel {
    async fn generate(&self, request: ImageRequest) -> Result<Generation, GenerationError> {
        let body = self.create_request(&request);

        let response = self.client.post("chat/completions").json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::UpstreamHttp { status, message });
        }

        let text = response.text().await?;
        let response: ChatCompletionResponse = serde_json::from_str(&text)?;
        response.try_into()
    }
}

// ================================================================
// Wire format
// ================================================================

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub modalities: Vec<Modality>,
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Text,
}

#[derive(Debug, Serialize)]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<MessageImage>,
}

/// Image entries come back either as a bare data URL string or wrapped in
/// an OpenAI-style `image_url` object, depending on the routed model.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageImage {
    Url(String),
    Object { image_url: ImageUrl },
}

impl MessageImage {
    fn into_url(self) -> String {
        match self {
            Self::Url(url) => url,
            Self::Object { image_url } => image_url.url,
        }
    }
}

/// Strips a `data:*;base64,` prefix so callers always see raw base64.
/// Anything that is not a data URL passes through untouched.
fn strip_data_url(url: &str) -> &str {
    match url.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => url,
    }
}

impl TryFrom<ChatCompletionResponse> for Generation {
    type Error = GenerationError;

    fn try_from(response: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(GenerationError::NoImageReturned { text: None })?;

        let text = message.content.filter(|content| !content.is_empty());

        match message.images.into_iter().next() {
            Some(image) => Ok(Generation {
                image_data: strip_data_url(&image.into_url()).to_string(),
                text,
            }),
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
                "model": "google/gemini-2.5-flash-image-preview",
                "messages": [{ "role": "user", "content": "cyberpunk, neon, a cat" }],
                "modalities": ["image", "text"],
                "image_config": { "aspect_ratio": "1:1", "image_size": "1K" }
            })
        );
    }

    #[test]
    fn attaches_images_as_data_urls() {
        let request = ImageRequest::new("restyle this")
            .images(vec!["QUFBQQ==".to_string()])
            .aspect_ratio(AspectRatio::Portrait9x16)
            .image_size(ImageSize::TwoK);
        let body = model().create_request(&request);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "google/gemini-2.5-flash-image-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "restyle this" },
                        {
                            "type": "image_url",
                            "image_url": { "url": "data:image/png;base64,QUFBQQ==" }
                        }
                    ]
                }],
                "modalities": ["image", "text"],
                "image_config": { "aspect_ratio": "9:16", "image_size": "2K" }
            })
        );
    }

    #[test]
    fn data_url_images_are_stripped_to_base64() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "done",
                    "images": ["data:image/png;base64,AAAA"]
                }
            }]
        }))
        .unwrap();

        let generation = Generation::try_from(response).unwrap();
        assert_eq!(generation.image_data, "AAAA");
        assert_eq!(generation.text.as_deref(), Some("done"));
    }

    #[test]
    fn object_form_images_are_unwrapped() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "",
                    "images": [{
                        "type": "image_url",
                        "image_url": { "url": "data:image/webp;base64,QkJCQg==" }
                    }]
                }
            }]
        }))
        .unwrap();

        let generation = Generation::try_from(response).unwrap();
        assert_eq!(generation.image_data, "QkJCQg==");
        assert!(generation.text.is_none());
    }

    #[test]
    fn bare_base64_passes_through() {
        assert_eq!(strip_data_url("QUFBQQ=="), "QUFBQQ==");
        assert_eq!(strip_data_url("data:image/png;base64,QUFBQQ=="), "QUFBQQ==");
        assert_eq!(strip_data_url("https://cdn.example/img.png"), "https://cdn.example/img.png");
    }

    #[test]
    fn first_image_wins() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": { "images": ["data:image/png;base64,Rk9P", "data:image/png;base64,QkFS"] }
            }]
        }))
        .unwrap();

        assert_eq!(Generation::try_from(response).unwrap().image_data, "Rk9P");
    }

    #[test]
    fn missing_images_surface_the_refusal_text() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": { "content": "I can't generate that", "images": [] }
            }]
        }))
        .unwrap();

        match Generation::try_from(response) {
            Err(GenerationError::NoImageReturned { text }) => {
                assert_eq!(text.as_deref(), Some("I can't generate that"));
            }
            other => panic!("expected NoImageReturned, got {other:?}"),
        }
    }

    #[test]
    fn empty_choices_is_a_no_image_error() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(
            Generation::try_from(response),
            Err(GenerationError::NoImageReturned { text: None })
        ));
    }
}
