use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, MessagePart,
    ResponseFormat,
};
use super::VisionService;
use crate::error::UpstreamError;
use crate::{prompts, Result};
use async_trait::async_trait;
use reqwest::Client;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat-completion client for the hosted multimodal model gateway.
///
/// No request timeout is set and failures are never retried; the caller
/// decides whether to try again.
pub struct GatewayVisionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GatewayVisionClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self::new_with_client(api_key, model, base_url, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        base_url: String,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, image_base64: &str) -> ChatCompletionRequest {
        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(
                prompts::ANALYSIS_SYSTEM.trim().to_string(),
            )),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::Parts(vec![
                MessagePart::text(prompts::ANALYSIS_USER.trim()),
                MessagePart::image_url(format!("data:image/jpeg;base64,{}", image_base64)),
            ])),
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
            response_format: Some(ResponseFormat::json_object()),
        }
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to AI gateway: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("AI gateway error (status {}): {}", status, error_text);
            return Err(UpstreamError::from_status(status.as_u16()).into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse AI gateway response: {}\nBody: {}", e, body);
            UpstreamError::InvalidEnvelope(e.to_string()).into()
        })
    }
}

#[async_trait]
impl VisionService for GatewayVisionClient {
    async fn analyze_image(&self, image_base64: &str) -> Result<String> {
        tracing::debug!(
            "Sending {} base64 characters to model {}",
            image_base64.len(),
            self.model
        );

        let request = self.build_request(image_base64);
        let response = self.chat_completion(&request).await?;
        tracing::info!("AI response received");

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::MissingContent.into())
    }
}
