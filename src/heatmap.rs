//! Attention heatmap rendering
//!
//! The gateway has no access to model internals, so the only generator is a
//! fixed decorative overlay. The trait exists so a real saliency source
//! (e.g. Grad-CAM) can be dropped in without touching the pipeline.

use crate::models::Disease;
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;

#[async_trait]
pub trait HeatmapGenerator: Send + Sync {
    /// Produce an image data URL visualizing model attention.
    async fn generate(&self, image_base64: &str, diseases: &[Disease]) -> Result<String>;
}

const PLACEHOLDER_SVG: &str = r#"<svg width="512" height="512" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="grad1" cx="50%" cy="50%" r="50%">
      <stop offset="0%" style="stop-color:rgb(255,0,0);stop-opacity:0.8" />
      <stop offset="50%" style="stop-color:rgb(255,255,0);stop-opacity:0.5" />
      <stop offset="100%" style="stop-color:rgb(0,0,255);stop-opacity:0.2" />
    </radialGradient>
  </defs>
  <ellipse cx="256" cy="280" rx="120" ry="150" fill="url(#grad1)" />
  <ellipse cx="200" cy="220" rx="60" ry="80" fill="url(#grad1)" opacity="0.6" />
</svg>"#;

/// Constant SVG overlay. Ignores both the image and the findings.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderHeatmap;

impl PlaceholderHeatmap {
    pub fn data_url() -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(PLACEHOLDER_SVG)
        )
    }
}

#[async_trait]
impl HeatmapGenerator for PlaceholderHeatmap {
    async fn generate(&self, _image_base64: &str, _diseases: &[Disease]) -> Result<String> {
        tracing::debug!("Rendering placeholder heatmap (no saliency data available)");
        Ok(Self::data_url())
    }
}
