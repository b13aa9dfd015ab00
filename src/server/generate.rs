use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use super::AppState;
use crate::config::UpstreamKind;
use crate::features::Feature;
use crate::generation::{
    Generation, GenerationError, GenerationRequest, ImageModel, ImageRequest, compose_prompt,
};
use crate::providers::{gemini, openrouter};

/// Wire shape of every reply from the generate route: exactly one of
/// `imageData` or `error` is present.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn ok(generation: Generation) -> Self {
        Self {
            success: true,
            image_data: Some(generation.image_data),
            text: generation.text,
            error: None,
        }
    }

    fn err(error: &GenerationError) -> Self {
        Self {
            success: false,
            image_data: None,
            text: None,
            error: Some(error.client_message()),
        }
    }
}

pub(super) async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> (StatusCode, Json<GenerateResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return reply(&GenerationError::Unexpected(format!(
                "request body: {rejection}"
            )));
        }
    };

    match run(&state, request).await {
        Ok(generation) => (StatusCode::OK, Json(GenerateResponse::ok(generation))),
        Err(error) => reply(&error),
    }
}

fn reply(error: &GenerationError) -> (StatusCode, Json<GenerateResponse>) {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if status.is_server_error() {
        tracing::error!(%error, "generation failed");
    } else {
        tracing::debug!(%error, "request rejected");
    }

    (status, Json(GenerateResponse::err(error)))
}

/// The whole pipeline: resolve the workflow, validate inputs, resolve the
/// credential, compose the prompt, dispatch to the configured upstream.
/// Validation failures return before any outbound call.
async fn run(state: &AppState, request: GenerationRequest) -> Result<Generation, GenerationError> {
    let feature = match request.feature_id.as_deref() {
        Some(id) => Some(Feature::find(id).ok_or_else(|| {
            GenerationError::InvalidRequest(format!("unknown feature '{id}'"))
        })?),
        None => None,
    };

    match feature {
        Some(feature) => feature.validate(&request.prompt, request.images.len())?,
        None => {
            if request.prompt.trim().is_empty() {
                return Err(GenerationError::MissingPrompt);
            }
        }
    }

    let api_key = request
        .api_key
        .as_deref()
        .or(state.config.api_key.as_deref())
        .ok_or(GenerationError::MissingCredential)?
        .to_string();

    // Request-level style keywords win over the workflow's presets.
    let keywords: Vec<&str> = if request.styles.is_empty() {
        feature
            .map(|feature| feature.style_keywords.to_vec())
            .unwrap_or_default()
    } else {
        request.styles.iter().map(String::as_str).collect()
    };
    let prompt = compose_prompt(&keywords, &request.prompt);

    let config = request.config.clone().unwrap_or_default();
    let google_search =
        config.use_google_search || feature.is_some_and(Feature::wants_google_search);

    let image_request = ImageRequest::new(prompt)
        .images(request.images)
        .aspect_ratio(config.aspect_ratio.unwrap_or_default())
        .image_size(config.image_size.unwrap_or_default())
        .google_search(google_search);

    let tier = feature.map(|feature| feature.tier).unwrap_or_default();
    let model_name = tier.model_id(state.config.upstream);

    tracing::debug!(
        model = model_name,
        feature = feature.map_or("none", |feature| feature.id),
        images = image_request.images.len(),
        "dispatching generation"
    );

    match state.config.upstream {
        UpstreamKind::Gemini => {
            let mut builder = gemini::Client::builder(&api_key)
                .custom_client(state.http_client.clone());
            if let Some(url) = state.config.upstream_url.as_deref() {
                builder = builder.base_url(url);
            }
            let model = builder.build()?.image_model(model_name);
            model.generate(image_request).await
        }
        UpstreamKind::OpenRouter => {
            let mut builder = openrouter::Client::builder(&api_key)
                .custom_client(state.http_client.clone());
            if let Some(url) = state.config.upstream_url.as_deref() {
                builder = builder.base_url(url);
            }
            let model = builder.build()?.image_model(model_name);
            model.generate(image_request).await
        }
    }
}
