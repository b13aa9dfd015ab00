//! imgen is a small, self-hostable HTTP gateway in front of Gemini-family
//! image generation.
//!
//! It accepts one JSON request describing a generation task (prompt, optional
//! reference images, optional tuning) and relays it to an upstream image
//! model, either directly against the Google Generative Language API or
//! through OpenRouter's chat-completions relay. Both upstream shapes funnel
//! into the same response contract: the first inline image the model returned
//! plus an optional caption.
//!
//! The crate doubles as a library: the provider adapters can be used without
//! the HTTP layer.
//!
//! # Example
//! ```
//! use imgen::generation::{ImageModel, ImageRequest};
//! use imgen::providers::gemini;
//!
//! let client = gemini::Client::builder("your-google-api-key").build()?;
//! let model = client.image_model(gemini::GEMINI_2_5_FLASH_IMAGE);
//!
//! let generation = model
//!     .generate(ImageRequest::new("a watercolor lighthouse at dusk"))
//!     .await?;
//! println!("{} base64 bytes", generation.image_data.len());
//! ```

pub mod config;
pub mod features;
pub mod generation;
pub mod providers;
pub mod server;
