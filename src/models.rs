//! Data models and structures
//!
//! Defines the request/response shapes of the analysis gateway and the
//! partially-trusted schema of the model's JSON reply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validation accuracy label reported with every result. Not computed.
pub const MODEL_ACCURACY: f64 = 94.2;

/// Report text used when the model omits one.
pub const FALLBACK_REPORT: &str = "Analysis completed successfully.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Data URL or raw base64 image. Optional here so that absence is a
    /// validation failure rather than a body decode failure.
    #[serde(default)]
    pub image_data: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: Some(image_data.into()),
        }
    }
}

/// One finding exactly as the model emitted it. Accessors read the expected
/// fields without rewriting the entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Disease(Value);

impl Disease {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Reported probability; anything non-numeric counts as 0.
    pub fn probability(&self) -> f64 {
        self.0
            .get("probability")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn severity(&self) -> Option<&str> {
        self.0.get("severity").and_then(Value::as_str)
    }
}

impl From<Value> for Disease {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub diseases: Vec<Disease>,
    pub report: String,
    pub heatmap: String,
    pub timestamp: String,
    pub model_accuracy: f64,
    pub detection_confidence: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            details: err.details(),
        }
    }
}

/// The model's reply after normalization. All defaults are applied here and
/// nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAnalysis {
    pub diseases: Vec<Disease>,
    pub report: String,
}

impl ModelAnalysis {
    /// Parse the model's text output. Only JSON syntax is enforced; fields of
    /// the wrong shape fall back to their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            tracing::error!("Failed to parse AI response as JSON: {}", text);
            Error::MalformedResponse(e)
        })?;

        Ok(Self::from_value(value))
    }

    fn from_value(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                tracing::warn!("AI response is not a JSON object: {}", other);
                Map::new()
            }
        };

        let diseases = match object.remove("diseases") {
            Some(Value::Array(items)) => items.into_iter().map(Disease::from).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                tracing::warn!("Ignoring non-array diseases field: {}", other);
                Vec::new()
            }
        };

        let report = match object.remove("report") {
            Some(Value::String(report)) if !report.is_empty() => report,
            _ => FALLBACK_REPORT.to_string(),
        };

        Self { diseases, report }
    }
}

/// Mean disease probability as a rounded percentage; 0 for no diseases.
pub fn detection_confidence(diseases: &[Disease]) -> u32 {
    if diseases.is_empty() {
        return 0;
    }

    let total: f64 = diseases.iter().map(Disease::probability).sum();
    let mean = total / diseases.len() as f64;
    let percent = (mean * 100.0).round();

    if percent.is_nan() || percent <= 0.0 {
        0
    } else {
        percent as u32
    }
}
