use super::VisionService;
use crate::error::UpstreamError;
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the hosted model.
#[derive(Clone)]
pub struct MockVisionClient {
    responses: Arc<Mutex<Vec<std::result::Result<String, UpstreamError>>>>,
    call_count: Arc<Mutex<usize>>,
    last_image: Arc<Mutex<Option<String>>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_image: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_error(self, error: UpstreamError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The base64 payload forwarded by the most recent call.
    pub fn last_image(&self) -> Option<String> {
        self.last_image.lock().unwrap().clone()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn analyze_image(&self, image_base64: &str) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_image.lock().unwrap() = Some(image_base64.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(r#"{"diseases":[],"report":"No acute cardiopulmonary findings."}"#.to_string());
        }

        let index = (count - 1) % responses.len();
        responses[index].clone().map_err(Into::into)
    }
}
