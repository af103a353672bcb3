//! Request pipeline: validate, call the model, normalize, assemble.

use crate::ai::{GatewayVisionClient, VisionService};
use crate::config::{Config, API_KEY_VAR};
use crate::heatmap::{HeatmapGenerator, PlaceholderHeatmap};
use crate::models::{
    detection_confidence, AnalysisRequest, AnalysisResult, ModelAnalysis, MODEL_ACCURACY,
};
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info};

const BASE64_MARKER: &str = "base64,";

/// Runs one X-ray through the hosted model. Holds no per-request state.
pub struct Analyzer {
    vision: Option<Box<dyn VisionService>>,
    heatmap: Box<dyn HeatmapGenerator>,
}

/// Injectable service bundle used to construct [`Analyzer`] in tests.
pub struct AnalyzerServices {
    /// `None` when no upstream credential is configured.
    pub vision: Option<Box<dyn VisionService>>,
    pub heatmap: Box<dyn HeatmapGenerator>,
}

impl Analyzer {
    pub fn with_services(services: AnalyzerServices) -> Self {
        Self {
            vision: services.vision,
            heatmap: services.heatmap,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let vision = config.api_key.as_ref().map(|api_key| {
            info!(
                "Vision provider: {} (model: {})",
                config.base_url, config.model
            );
            Box::new(GatewayVisionClient::new(
                api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
            )) as Box<dyn VisionService>
        });

        if vision.is_none() {
            tracing::warn!("{} is not set; analysis requests will fail", API_KEY_VAR);
        }

        Self::with_services(AnalyzerServices {
            vision,
            heatmap: Box::new(PlaceholderHeatmap),
        })
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        match self.run(request).await {
            Ok(result) => {
                info!(
                    "Analysis complete: {} findings, confidence {}%",
                    result.diseases.len(),
                    result.detection_confidence
                );
                Ok(result)
            }
            Err(e) => {
                error!("Error in X-ray analysis: {}", e.details());
                Err(e)
            }
        }
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let image_data = request
            .image_data
            .as_deref()
            .filter(|data| !data.is_empty())
            .ok_or_else(|| Error::Validation("No image data provided".to_string()))?;

        info!("Starting X-ray analysis...");

        let image_base64 = strip_data_url_prefix(image_data);

        let vision = self
            .vision
            .as_deref()
            .ok_or_else(|| Error::Configuration(API_KEY_VAR.to_string()))?;

        let content = vision.analyze_image(image_base64).await?;
        let analysis = ModelAnalysis::from_json(&content)?;
        for disease in &analysis.diseases {
            debug!(
                "Finding: {} (severity {}, probability {})",
                disease.name().unwrap_or("unnamed"),
                disease.severity().unwrap_or("unspecified"),
                disease.probability()
            );
        }

        let heatmap = self
            .heatmap
            .generate(image_base64, &analysis.diseases)
            .await?;

        let detection_confidence = detection_confidence(&analysis.diseases);

        Ok(AnalysisResult {
            diseases: analysis.diseases,
            report: analysis.report,
            heatmap,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            model_accuracy: MODEL_ACCURACY,
            detection_confidence,
        })
    }
}

/// Drop everything up to and including the first `base64,` marker. Input
/// without the marker is taken to be bare base64.
pub fn strip_data_url_prefix(image_data: &str) -> &str {
    match image_data.find(BASE64_MARKER) {
        Some(index) => &image_data[index + BASE64_MARKER.len()..],
        None => image_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockVisionClient;
    use crate::error::UpstreamError;
    use crate::models::FALLBACK_REPORT;
    use pretty_assertions::assert_eq;

    fn analyzer_with(mock: &MockVisionClient) -> Analyzer {
        Analyzer::with_services(AnalyzerServices {
            vision: Some(Box::new(mock.clone())),
            heatmap: Box::new(PlaceholderHeatmap),
        })
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("base64,"), "");
        assert_eq!(
            strip_data_url_prefix("data:image/jpeg;base64,QUJDbase64,RA=="),
            "QUJDbase64,RA=="
        );
    }

    #[tokio::test]
    async fn test_missing_image_data_skips_upstream() {
        let mock = MockVisionClient::new();
        let analyzer = analyzer_with(&mock);

        for request in [AnalysisRequest::default(), AnalysisRequest::new("")] {
            let err = analyzer.analyze(&request).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
            assert_eq!(err.to_string(), "No image data provided");
        }
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let analyzer = Analyzer::from_config(&Config::default());

        let err = analyzer
            .analyze(&AnalysisRequest::new("data:image/jpeg;base64,AAAA"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("AI_GATEWAY_API_KEY"));
    }

    #[tokio::test]
    async fn test_validation_precedes_configuration() {
        let analyzer = Analyzer::from_config(&Config::default());
        let err = analyzer
            .analyze(&AnalysisRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_forwards_payload_after_marker() {
        let mock = MockVisionClient::new();
        let analyzer = analyzer_with(&mock);

        analyzer
            .analyze(&AnalysisRequest::new("data:image/png;base64,iVBORw0KGgo="))
            .await
            .unwrap();
        assert_eq!(mock.last_image().as_deref(), Some("iVBORw0KGgo="));

        analyzer
            .analyze(&AnalysisRequest::new("/9j/4AAQSkZJRg=="))
            .await
            .unwrap();
        assert_eq!(mock.last_image().as_deref(), Some("/9j/4AAQSkZJRg=="));
    }

    #[tokio::test]
    async fn test_pneumonia_scenario() {
        let mock = MockVisionClient::new().with_response(
            r#"{"diseases":[{"name":"Pneumonia","probability":0.8,"severity":"high"}],"report":"Findings: ..."}"#
                .to_string(),
        );
        let analyzer = analyzer_with(&mock);

        let result = analyzer
            .analyze(&AnalysisRequest::new("data:image/jpeg;base64,AAAA"))
            .await
            .unwrap();

        assert_eq!(result.detection_confidence, 80);
        assert_eq!(result.model_accuracy, 94.2);
        assert_eq!(result.report, "Findings: ...");
        assert_eq!(
            serde_json::to_value(&result.diseases).unwrap(),
            serde_json::json!([{"name": "Pneumonia", "probability": 0.8, "severity": "high"}])
        );
        assert!(result.heatmap.starts_with("data:image/svg+xml;base64,"));
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
        assert!(result.timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_empty_findings_and_missing_report() {
        let mock = MockVisionClient::new().with_response(r#"{"diseases":[]}"#.to_string());
        let result = analyzer_with(&mock)
            .analyze(&AnalysisRequest::new("AAAA"))
            .await
            .unwrap();

        assert!(result.diseases.is_empty());
        assert_eq!(result.detection_confidence, 0);
        assert_eq!(result.report, FALLBACK_REPORT);
        assert!(!result.heatmap.is_empty());
    }

    #[tokio::test]
    async fn test_findings_returned_verbatim() {
        let mock = MockVisionClient::new().with_response(
            r#"{"diseases":[{"name":"Nodule","probability":0.8},"junk",{"name":"A","probability":1,"severity":null}]}"#
                .to_string(),
        );
        let result = analyzer_with(&mock)
            .analyze(&AnalysisRequest::new("AAAA"))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&result.diseases).unwrap(),
            r#"[{"name":"Nodule","probability":0.8},"junk",{"name":"A","probability":1,"severity":null}]"#
        );
        assert_eq!(result.detection_confidence, 60);
    }

    #[tokio::test]
    async fn test_upstream_errors_propagate() {
        let mock = MockVisionClient::new().with_error(UpstreamError::RateLimited);
        let err = analyzer_with(&mock)
            .analyze(&AnalysisRequest::new("AAAA"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_malformed() {
        let mock = MockVisionClient::new()
            .with_response("The lungs appear clear.".to_string());
        let err = analyzer_with(&mock)
            .analyze(&AnalysisRequest::new("AAAA"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
