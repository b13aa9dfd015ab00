//! Google Gemini API client, session style: one-shot `generateContent`
//! calls against the Generative Language API.
//!
//! # Example
//! ```
//! use imgen::providers::gemini;
//!
//! let client = gemini::Client::builder("YOUR_API_KEY").build()?;
//!
//! let nano_banana = client.image_model(gemini::GEMINI_2_5_FLASH_IMAGE);
//! ```

pub mod client;
pub mod generation;

pub use client::Client;
pub use generation::{GEMINI_2_5_FLASH_IMAGE, GEMINI_3_PRO_IMAGE, ImageModel};
