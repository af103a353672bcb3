//! Analysis gateway for chest X-ray images
//!
//! Forwards an uploaded X-ray to a hosted multimodal model, coerces the
//! model's JSON reply into a fixed result schema, attaches a placeholder
//! attention heatmap and reports an aggregate detection confidence.

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod models;
pub mod prompts;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
