//! Result extraction from a finished generation job

use reel_core::{ReelError, Result};

use crate::provider::JobStatus;

/// Paths to the first sample's media URI, tried in order.
///
/// The REST API nests samples under `generateVideoResponse`; the SDK
/// flattens them into `generatedVideos`.
const MEDIA_URI_POINTERS: &[&str] = &[
    "/response/generateVideoResponse/generatedSamples/0/video/uri",
    "/response/generatedVideos/0/video/uri",
];

/// Find the first generated sample's media URI in an operation payload.
///
/// Empty strings count as absent.
pub fn locate_media_uri(raw: &serde_json::Value) -> Option<&str> {
    MEDIA_URI_POINTERS
        .iter()
        .filter_map(|pointer| raw.pointer(pointer))
        .filter_map(|value| value.as_str())
        .find(|uri| !uri.trim().is_empty())
}

/// Extract the media locator from a terminal job status.
///
/// Fails with `NoResult` carrying the serialized payload when the job is not
/// finished or produced no usable locator.
pub fn extract_locator(status: &JobStatus) -> Result<&str> {
    match (status.done, status.result_locator.as_deref()) {
        (true, Some(locator)) if !locator.trim().is_empty() => Ok(locator),
        _ => Err(ReelError::NoResult(
            serde_json::to_string(&status.raw).unwrap_or_else(|_| status.raw.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(done: bool, raw: serde_json::Value) -> JobStatus {
        JobStatus {
            done,
            result_locator: locate_media_uri(&raw).map(|s| s.to_string()),
            raw,
        }
    }

    #[test]
    fn test_locates_rest_shape() {
        let raw = json!({
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://host/files/abc:download?alt=media"}},
                        {"video": {"uri": "https://host/files/def:download?alt=media"}}
                    ]
                }
            }
        });
        assert_eq!(
            locate_media_uri(&raw),
            Some("https://host/files/abc:download?alt=media")
        );
    }

    #[test]
    fn test_locates_sdk_shape() {
        let raw = json!({"response": {"generatedVideos": [{"video": {"uri": "https://host/media/abc"}}]}});
        assert_eq!(locate_media_uri(&raw), Some("https://host/media/abc"));
    }

    #[test]
    fn test_empty_uri_is_absent() {
        let raw = json!({"response": {"generatedVideos": [{"video": {"uri": ""}}]}});
        assert_eq!(locate_media_uri(&raw), None);
    }

    #[test]
    fn test_extract_ok() {
        let s = status(
            true,
            json!({"response": {"generatedVideos": [{"video": {"uri": "https://host/media/abc"}}]}}),
        );
        assert_eq!(extract_locator(&s).unwrap(), "https://host/media/abc");
    }

    #[test]
    fn test_missing_locator_reports_payload() {
        let s = status(
            true,
            json!({"name": "operations/xyz", "done": true, "response": {"raiMediaFilteredCount": 1}}),
        );
        let err = extract_locator(&s).unwrap_err();
        match err {
            ReelError::NoResult(payload) => {
                assert!(payload.contains("operations/xyz"));
                assert!(payload.contains("raiMediaFilteredCount"));
            }
            other => panic!("expected NoResult, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_operation_is_no_result() {
        let s = status(
            true,
            json!({"done": true, "error": {"code": 400, "message": "prompt rejected"}}),
        );
        let err = extract_locator(&s).unwrap_err();
        assert!(err.to_string().contains("prompt rejected"));
    }

    #[test]
    fn test_pending_status_is_never_extracted() {
        let s = status(
            false,
            json!({"response": {"generatedVideos": [{"video": {"uri": "https://host/media/abc"}}]}}),
        );
        assert!(matches!(extract_locator(&s), Err(ReelError::NoResult(_))));
    }
}
