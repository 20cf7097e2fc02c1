//! The `generateVideo` capability exposed to the host agent framework

use reel_core::{ReelError, Result};
use serde::Deserialize;

use crate::context::InvocationContext;
use crate::pipeline::{log_failure, DeliveryReport, Pipeline};
use crate::poll::CancelToken;

pub const CAPABILITY_NAME: &str = "generateVideo";
pub const CAPABILITY_DESCRIPTION: &str =
    "Generates a video using Google Gemini Veo 3 from a text prompt";

/// Arguments accepted by the capability
#[derive(Debug, Deserialize)]
pub struct GenerateVideoArgs {
    pub prompt: String,
}

/// Host-facing wrapper around a configured pipeline
pub struct GenerateVideoCapability {
    pipeline: Pipeline,
}

impl GenerateVideoCapability {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn name(&self) -> &'static str {
        CAPABILITY_NAME
    }

    /// Name, description and JSON schema of the arguments, as registered with the host
    pub fn descriptor() -> serde_json::Value {
        serde_json::json!({
            "name": CAPABILITY_NAME,
            "description": CAPABILITY_DESCRIPTION,
            "schema": {
                "type": "object",
                "properties": {
                    "prompt": { "type": "string" }
                },
                "required": ["prompt"],
                "additionalProperties": false
            }
        })
    }

    /// Run the capability with raw host arguments.
    ///
    /// Returns the confirmation message with the delivered URL. Only the
    /// workspace URL is exposed, never the provider's media locator.
    pub fn run(
        &self,
        args: &serde_json::Value,
        ctx: &InvocationContext,
        cancel: &CancelToken,
    ) -> Result<String> {
        let args: GenerateVideoArgs = serde_json::from_value(args.clone())
            .map_err(|e| ReelError::InvalidRequest(format!("bad arguments: {}", e)))?;
        self.generate_video(&args.prompt, ctx, cancel)
            .map(|report| confirmation_message(&report))
    }

    /// Run the pipeline for one prompt, logging any failure
    pub fn generate_video(
        &self,
        prompt: &str,
        ctx: &InvocationContext,
        cancel: &CancelToken,
    ) -> Result<DeliveryReport> {
        self.pipeline.run(prompt, ctx, cancel).inspect_err(log_failure)
    }
}

/// The message returned to the host on success
pub fn confirmation_message(report: &DeliveryReport) -> String {
    format!("Video generated and uploaded: {}", report.asset.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::Harness;
    use reel_core::{TaskId, WorkspaceId};
    use serde_json::json;

    fn capability() -> GenerateVideoCapability {
        let (pipeline, _, _) = Harness::new().build();
        GenerateVideoCapability::new(pipeline)
    }

    #[test]
    fn test_descriptor() {
        let descriptor = GenerateVideoCapability::descriptor();
        assert_eq!(descriptor["name"], "generateVideo");
        assert_eq!(descriptor["schema"]["required"], json!(["prompt"]));
        assert_eq!(descriptor["schema"]["properties"]["prompt"]["type"], "string");
    }

    #[test]
    fn test_run_returns_confirmation_with_url() {
        let message = capability()
            .run(
                &json!({"prompt": "a cat surfing"}),
                &InvocationContext::task(TaskId(42), WorkspaceId(7)),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(message, "Video generated and uploaded: https://storage/abc.mp4");
        assert!(!message.contains("host/media"));
    }

    #[test]
    fn test_run_rejects_missing_prompt() {
        let err = capability()
            .run(
                &json!({"text": "a cat surfing"}),
                &InvocationContext::chat(WorkspaceId(7)),
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ReelError::InvalidRequest(_)));
    }

    #[test]
    fn test_run_with_host_action_json() {
        let ctx = InvocationContext::from_action_json(&json!({
            "type": "respond-chat-message",
            "workspace": {"id": 7}
        }))
        .unwrap();
        let message = capability()
            .run(&json!({"prompt": "waves"}), &ctx, &CancelToken::new())
            .unwrap();
        assert!(message.ends_with("https://storage/abc.mp4"));
    }
}
