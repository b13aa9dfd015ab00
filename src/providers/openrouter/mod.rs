//! OpenRouter API client, completion style: Gemini image models behind the
//! chat-completions relay.
//!
//! # Example
//! ```
//! use imgen::providers::openrouter;
//!
//! let client = openrouter::Client::builder("YOUR_API_KEY").build()?;
//!
//! let model = client.image_model(openrouter::GEMINI_2_5_FLASH_IMAGE);
//! ```

pub mod client;
pub mod generation;

pub use client::Client;
pub use generation::{GEMINI_2_5_FLASH_IMAGE, GEMINI_3_PRO_IMAGE, ImageModel};
