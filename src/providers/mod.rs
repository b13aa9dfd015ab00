//! Upstream adapters.
//!
//! Each provider owns its wire format and funnels into the shared
//! [`ImageModel`](crate::generation::ImageModel) contract, so the rest of the
//! gateway never learns which upstream style is active.

pub mod gemini;
pub mod openrouter;
