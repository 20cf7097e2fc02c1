//! Veo video generation provider
//!
//! Drives the Gemini API's long-running `predictLongRunning` operation.
//! Submission returns an operation name, which is re-fetched until `done`.
//! The finished media is downloaded with the API key as a query parameter.

use log::debug;
use reel_core::{ReelError, Result};

use crate::config::ReelConfig;
use crate::http::{
    build_agent, ensure_success, read_bytes, read_json, REQUEST_TIMEOUT_SECS,
    TRANSFER_TIMEOUT_SECS,
};
use crate::provider::*;

pub const DEFAULT_VEO_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VEO_MODEL: &str = "veo-3.0-generate-preview";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Veo provider for AI video generation
pub struct VeoProvider {
    api_key: String,
    api_url: String,
    model: String,
}

impl VeoProvider {
    /// Create a new VeoProvider from config
    pub fn from_config(config: &ReelConfig) -> Result<Self> {
        let api_key = config.require_provider_key()?.to_string();
        let api_url = config
            .provider
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_VEO_URL)
            .trim_end_matches('/')
            .to_string();
        let model = config
            .provider
            .model
            .as_deref()
            .unwrap_or(DEFAULT_VEO_MODEL)
            .to_string();

        Ok(Self {
            api_key,
            api_url,
            model,
        })
    }

    fn submit_url(&self) -> String {
        format!("{}/models/{}:predictLongRunning", self.api_url, self.model)
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.api_url, operation.trim_start_matches('/'))
    }
}

/// Build the `predictLongRunning` request body
pub fn build_payload(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "instances": [{ "prompt": request.prompt() }],
        "parameters": {
            "aspectRatio": request.aspect_ratio().as_str(),
            "personGeneration": request.person_policy().as_str()
        }
    })
}

impl VideoProvider for VeoProvider {
    fn name(&self) -> &str {
        "veo"
    }

    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let payload = build_payload(request);
        let mut response = build_agent(REQUEST_TIMEOUT_SECS)
            .post(&self.submit_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send_json(&payload)
            .map_err(|e| ReelError::Submission(format!("Veo request failed: {}", e)))?;

        ensure_success(&mut response, "Veo", ReelError::Submission)?;
        let raw = read_json(&mut response, "Veo", ReelError::Submission)?;
        JobHandle::from_operation(raw).map_err(ReelError::Submission)
    }

    fn poll(&self, handle: JobHandle) -> Result<JobHandle> {
        let mut response = build_agent(REQUEST_TIMEOUT_SECS)
            .get(&self.operation_url(&handle.id))
            .header(API_KEY_HEADER, &self.api_key)
            .call()
            .map_err(|e| ReelError::Poll(format!("Veo status query failed: {}", e)))?;

        ensure_success(&mut response, "Veo", ReelError::Poll)?;
        let raw = read_json(&mut response, "Veo", ReelError::Poll)?;
        JobHandle::from_operation(raw).map_err(ReelError::Poll)
    }

    fn fetch(&self, locator: &str) -> Result<AssetBytes> {
        let mut response = build_agent(TRANSFER_TIMEOUT_SECS)
            .get(locator)
            .query("key", &self.api_key)
            .call()
            .map_err(|e| ReelError::Download(format!("Video request failed: {}", e)))?;

        ensure_success(&mut response, "Video host", ReelError::Download)?;
        let bytes = read_bytes(response, ReelError::Download)?;
        debug!("Downloaded {} bytes from provider", bytes.len());
        Ok(AssetBytes::new(bytes))
    }
}
