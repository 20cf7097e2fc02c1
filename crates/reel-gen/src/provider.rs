//! Video provider trait and request/job types

use reel_core::{ReelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extract;

/// Output frame shape requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the provider may depict people
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonPolicy {
    #[default]
    #[serde(rename = "allow_all")]
    AllowAll,
}

impl PersonPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonPolicy::AllowAll => "allow_all",
        }
    }
}

impl fmt::Display for PersonPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to generate one video. Built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    prompt: String,
    aspect_ratio: AspectRatio,
    #[serde(rename = "personGeneration")]
    person_policy: PersonPolicy,
}

impl GenerationRequest {
    /// Create a request with the fixed generation parameters.
    ///
    /// Fails with `InvalidRequest` if the prompt is empty or whitespace.
    pub fn new(prompt: &str) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ReelError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }
        Ok(Self {
            prompt: prompt.to_string(),
            aspect_ratio: AspectRatio::default(),
            person_policy: PersonPolicy::default(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn person_policy(&self) -> PersonPolicy {
        self.person_policy
    }
}

/// Provider-side state of a submitted job.
///
/// Each poll consumes the current handle and yields its replacement,
/// so only one handle is ever live for an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHandle {
    /// Provider operation name (e.g. `models/veo-3.0-generate-preview/operations/abc`)
    pub id: String,
    /// Whether the provider reports the job as finished
    pub done: bool,
    /// The full operation payload as last returned by the provider
    pub raw: serde_json::Value,
}

impl JobHandle {
    /// Build a handle from a long-running operation object.
    ///
    /// `name` is required; a missing `done` flag means pending.
    pub fn from_operation(raw: serde_json::Value) -> std::result::Result<Self, String> {
        let id = raw
            .get("name")
            .and_then(|n| n.as_str())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                format!(
                    "operation has no name: {}",
                    serde_json::to_string(&raw).unwrap_or_default()
                )
            })?;
        let done = raw.get("done").and_then(|d| d.as_bool()).unwrap_or(false);
        Ok(Self { id, done, raw })
    }
}

/// Snapshot of a job as seen by the result extractor
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    pub done: bool,
    pub result_locator: Option<String>,
    pub raw: serde_json::Value,
}

impl From<JobHandle> for JobStatus {
    fn from(handle: JobHandle) -> Self {
        let result_locator = extract::locate_media_uri(&handle.raw).map(|s| s.to_string());
        Self {
            done: handle.done,
            result_locator,
            raw: handle.raw,
        }
    }
}

/// Raw bytes of a fetched video, owned by one invocation from fetch to upload
#[derive(Clone, PartialEq, Eq)]
pub struct AssetBytes(Vec<u8>);

impl AssetBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AssetBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetBytes({} bytes)", self.0.len())
    }
}

/// Trait implemented by each video generation backend (Veo, Mock)
pub trait VideoProvider: Send + Sync {
    /// Provider name (e.g. "veo", "mock")
    fn name(&self) -> &str;

    /// Create a generation job. Errors are `Submission`.
    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle>;

    /// Re-query a job, replacing the handle. Errors are `Poll`.
    fn poll(&self, handle: JobHandle) -> Result<JobHandle>;

    /// Download the finished media. Errors are `Download`.
    fn fetch(&self, locator: &str) -> Result<AssetBytes>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_trims_prompt_and_fixes_parameters() {
        let request = GenerationRequest::new("  a cat surfing ").unwrap();
        assert_eq!(request.prompt(), "a cat surfing");
        assert_eq!(request.aspect_ratio().as_str(), "16:9");
        assert_eq!(request.person_policy().as_str(), "allow_all");
    }

    #[test]
    fn test_request_rejects_blank_prompt() {
        let err = GenerationRequest::new("   ").unwrap_err();
        assert!(matches!(err, ReelError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_serializes_with_wire_names() {
        let request = GenerationRequest::new("waves").unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"prompt": "waves", "aspectRatio": "16:9", "personGeneration": "allow_all"})
        );
    }

    #[test]
    fn test_handle_from_pending_operation() {
        let handle = JobHandle::from_operation(json!({"name": "operations/abc"})).unwrap();
        assert_eq!(handle.id, "operations/abc");
        assert!(!handle.done);
    }

    #[test]
    fn test_handle_requires_name() {
        let err = JobHandle::from_operation(json!({"done": true})).unwrap_err();
        assert!(err.contains("no name"));
    }

    #[test]
    fn test_status_from_done_handle_carries_locator() {
        let handle = JobHandle::from_operation(json!({
            "name": "operations/abc",
            "done": true,
            "response": {"generatedVideos": [{"video": {"uri": "https://host/media/abc"}}]}
        }))
        .unwrap();
        let status = JobStatus::from(handle);
        assert!(status.done);
        assert_eq!(status.result_locator.as_deref(), Some("https://host/media/abc"));
    }

    #[test]
    fn test_asset_bytes_debug_hides_payload() {
        let bytes = AssetBytes::new(vec![0u8; 4]);
        assert_eq!(format!("{:?}", bytes), "AssetBytes(4 bytes)");
        assert_eq!(bytes.len(), 4);
    }
}
