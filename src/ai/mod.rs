//! Hosted model integration
//!
//! Sends the X-ray to a multimodal chat-completion gateway and hands back the
//! model's raw text reply. Interpreting that text is the caller's job.

pub mod client;
pub mod mime;
pub mod mock;
pub mod types;

pub use client::GatewayVisionClient;
pub use mock::MockVisionClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Submit a base64 image (no data-URL prefix) and return the model's text.
    async fn analyze_image(&self, image_base64: &str) -> Result<String>;
}
