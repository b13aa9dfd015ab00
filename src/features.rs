//! The workflow catalog.
//!
//! A static table of the generation presets the gateway exposes. Each entry
//! pins down what the request must contain (prompt, image counts), which
//! model tier serves it, and any style keywords that get prefixed onto the
//! prompt. The table is defined at build time and never changes; lookups are
//! a linear scan over six entries.

use serde::Serialize;

use crate::config::UpstreamKind;
use crate::generation::GenerationError;
use crate::providers::{gemini, openrouter};

/// Catalog grouping, mirrored in the JSON the catalog endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Generation,
    Editing,
    Special,
}

/// Which model family serves a workflow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Flash,
    Pro,
}

impl ModelTier {
    /// Model identifier for this tier on the given upstream style. OpenRouter
    /// routes the same models under a `google/` prefix.
    pub fn model_id(&self, upstream: UpstreamKind) -> &'static str {
        match (upstream, self) {
            (UpstreamKind::Gemini, Self::Flash) => gemini::GEMINI_2_5_FLASH_IMAGE,
            (UpstreamKind::Gemini, Self::Pro) => gemini::GEMINI_3_PRO_IMAGE,
            (UpstreamKind::OpenRouter, Self::Flash) => openrouter::GEMINI_2_5_FLASH_IMAGE,
            (UpstreamKind::OpenRouter, Self::Pro) => openrouter::GEMINI_3_PRO_IMAGE,
        }
    }
}

/// One workflow preset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: FeatureCategory,
    pub requires_image: bool,
    pub requires_multiple_images: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,
    pub tier: ModelTier,
    /// Keywords composed in front of the user prompt, in this order.
    pub style_keywords: &'static [&'static str],
}

pub static FEATURES: &[Feature] = &[
    Feature {
        id: "text-to-image",
        name: "Text to Image",
        description: "Generate stunning images from text descriptions using Gemini 2.5 Flash",
        icon: "\u{2728}",
        category: FeatureCategory::Generation,
        requires_image: false,
        requires_multiple_images: false,
        max_images: None,
        tier: ModelTier::Flash,
        style_keywords: &[],
    },
    Feature {
        id: "image-editing",
        name: "Image Editing",
        description: "Edit existing images with text prompts - add, remove, or modify elements",
        icon: "\u{1F3A8}",
        category: FeatureCategory::Editing,
        requires_image: true,
        requires_multiple_images: false,
        max_images: None,
        tier: ModelTier::Flash,
        style_keywords: &[],
    },
    Feature {
        id: "multi-image-compose",
        name: "Multi-Image Composition",
        description: "Combine up to 14 reference images to create new scenes",
        icon: "\u{1F5BC}\u{FE0F}",
        category: FeatureCategory::Editing,
        requires_image: true,
        requires_multiple_images: true,
        max_images: Some(14),
        tier: ModelTier::Pro,
        style_keywords: &[],
    },
    Feature {
        id: "search-grounding",
        name: "Search-Grounded Generation",
        description: "Generate images based on real-time information from Google Search",
        icon: "\u{1F50D}",
        category: FeatureCategory::Generation,
        requires_image: false,
        requires_multiple_images: false,
        max_images: None,
        tier: ModelTier::Pro,
        style_keywords: &[],
    },
    Feature {
        id: "high-res-generation",
        name: "High-Resolution Generation",
        description: "Create professional 4K images with Gemini 3 Pro",
        icon: "\u{1F4F8}",
        category: FeatureCategory::Generation,
        requires_image: false,
        requires_multiple_images: false,
        max_images: None,
        tier: ModelTier::Pro,
        style_keywords: &[],
    },
    Feature {
        id: "social-media-thumbnail",
        name: "Social Media Thumbnail Generator",
        description: "Create viral-worthy thumbnails with dramatic scenes, bold text, and eye-catching elements",
        icon: "\u{1F680}",
        category: FeatureCategory::Special,
        requires_image: true,
        requires_multiple_images: false,
        max_images: None,
        tier: ModelTier::Pro,
        style_keywords: &["thumbnail", "bold text", "high contrast"],
    },
];

impl Feature {
    /// Looks a workflow up by its id.
    pub fn find(id: &str) -> Option<&'static Feature> {
        FEATURES.iter().find(|feature| feature.id == id)
    }

    /// Editing workflows may run on images alone; everything else needs a
    /// prompt.
    pub fn allows_empty_prompt(&self) -> bool {
        self.category == FeatureCategory::Editing
    }

    /// The search-grounding workflow turns the grounding tool on even when
    /// the request config does not ask for it.
    pub fn wants_google_search(&self) -> bool {
        self.id == "search-grounding"
    }

    /// Checks the input rules this workflow carries. Runs before anything is
    /// sent upstream.
    pub fn validate(&self, prompt: &str, image_count: usize) -> Result<(), GenerationError> {
        if prompt.trim().is_empty() && !self.allows_empty_prompt() {
            return Err(GenerationError::MissingPrompt);
        }
        if self.requires_image && image_count == 0 {
            return Err(GenerationError::InvalidRequest(format!(
                "feature '{}' requires at least one input image",
                self.id
            )));
        }
        if self.requires_multiple_images && image_count < 2 {
            return Err(GenerationError::InvalidRequest(format!(
                "feature '{}' requires at least two input images",
                self.id
            )));
        }
        if let Some(max) = self.max_images {
            if image_count > max {
                return Err(GenerationError::InvalidRequest(format!(
                    "feature '{}' accepts at most {} images, got {}",
                    self.id, max, image_count
                )));
            }
        }
        Ok(())
    }
}
