//! Mock provider for testing
//!
//! Finishes jobs after a configurable number of polls and serves a tiny
//! placeholder MP4 without any network calls.

use reel_core::{ReelError, Result};

use crate::provider::*;

const MOCK_SCHEME: &str = "mock://veo/";

/// A mock provider that simulates a long-running video job locally
pub struct MockVideoProvider {
    polls_until_done: u32,
}

impl Default for MockVideoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVideoProvider {
    pub fn new() -> Self {
        Self::with_polls(1)
    }

    /// Jobs report done on the `polls`-th status query (0 = done on submit)
    pub fn with_polls(polls: u32) -> Self {
        Self {
            polls_until_done: polls,
        }
    }

    fn operation(&self, id: &str, polls: u32, prompt: &str) -> JobHandle {
        let done = polls >= self.polls_until_done;
        let mut raw = serde_json::json!({
            "name": id,
            "done": done,
            "metadata": { "polls": polls, "prompt": prompt }
        });
        if done {
            raw["response"] = serde_json::json!({
                "generateVideoResponse": {
                    "generatedSamples": [
                        { "video": { "uri": format!("{}{}", MOCK_SCHEME, id) } }
                    ]
                }
            });
        }
        JobHandle { id: id.to_string(), done, raw }
    }
}

impl VideoProvider for MockVideoProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let id = format!("operations/mock-{}", uuid::Uuid::new_v4().simple());
        Ok(self.operation(&id, 0, request.prompt()))
    }

    fn poll(&self, handle: JobHandle) -> Result<JobHandle> {
        let polls = handle
            .raw
            .pointer("/metadata/polls")
            .and_then(|p| p.as_u64())
            .unwrap_or(0) as u32;
        let prompt = handle
            .raw
            .pointer("/metadata/prompt")
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(self.operation(&handle.id, polls + 1, &prompt))
    }

    fn fetch(&self, locator: &str) -> Result<AssetBytes> {
        if !locator.starts_with(MOCK_SCHEME) {
            return Err(ReelError::Download(format!(
                "mock provider cannot fetch {}",
                locator
            )));
        }
        Ok(AssetBytes::new(minimal_mp4()))
    }
}

/// The smallest MP4 that players recognise: an `ftyp` box and an empty `mdat`
fn minimal_mp4() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32);

    // ftyp: size, type, major brand, minor version, compatible brands
    bytes.extend_from_slice(&24u32.to_be_bytes());
    bytes.extend_from_slice(b"ftyp");
    bytes.extend_from_slice(b"isom");
    bytes.extend_from_slice(&0x200u32.to_be_bytes());
    bytes.extend_from_slice(b"isom");
    bytes.extend_from_slice(b"mp41");

    // mdat with no payload
    bytes.extend_from_slice(&8u32.to_be_bytes());
    bytes.extend_from_slice(b"mdat");

    bytes
}
