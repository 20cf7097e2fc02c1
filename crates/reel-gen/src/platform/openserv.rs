//! OpenServ platform client
//!
//! Uploads files into a workspace and posts usage records, both
//! authenticated with the `x-openserv-key` header.

use log::debug;
use reel_core::{ReelError, Result, WorkspaceId};

use crate::config::ReelConfig;
use crate::http::{
    build_agent, ensure_success, read_json, REQUEST_TIMEOUT_SECS, TRANSFER_TIMEOUT_SECS,
};
use crate::storage::{AssetStorage, StoredFile, UploadRequest};
use crate::usage::{UsageEvent, UsageLedger};

pub const DEFAULT_OPENSERV_URL: &str = "https://api.openserv.ai";
const API_KEY_HEADER: &str = "x-openserv-key";

/// Client for the OpenServ workspace API
#[derive(Debug, Clone)]
pub struct OpenServClient {
    api_key: String,
    base_url: String,
}

impl OpenServClient {
    /// Create a new client from config
    pub fn from_config(config: &ReelConfig) -> Result<Self> {
        let api_key = config.require_platform_key()?.to_string();
        let base_url = config
            .platform
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENSERV_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self { api_key, base_url })
    }

    pub fn upload_url(&self, workspace_id: WorkspaceId) -> String {
        format!("{}/workspaces/{}/file", self.base_url, workspace_id)
    }

    pub fn usage_url(&self, workspace_id: WorkspaceId) -> String {
        format!("{}/workspaces/{}/usage-record", self.base_url, workspace_id)
    }
}

impl AssetStorage for OpenServClient {
    fn name(&self) -> &str {
        "openserv"
    }

    fn upload(&self, request: UploadRequest) -> Result<StoredFile> {
        let boundary = format!("reel-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_body(&boundary, &request.path, request.file.as_slice())?;
        // The fetched buffer is no longer needed once the body is assembled
        drop(request.file);

        let mut response = build_agent(TRANSFER_TIMEOUT_SECS)
            .post(&self.upload_url(request.workspace_id))
            .header(API_KEY_HEADER, &self.api_key)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send(&body[..])
            .map_err(|e| ReelError::Upload(format!("OpenServ upload failed: {}", e)))?;

        ensure_success(&mut response, "OpenServ", ReelError::Upload)?;
        let value = read_json(&mut response, "OpenServ", ReelError::Upload)?;
        parse_upload_response(value)
    }
}

impl UsageLedger for OpenServClient {
    fn name(&self) -> &str {
        "openserv"
    }

    fn record(&self, event: &UsageEvent) -> Result<()> {
        let mut response = build_agent(REQUEST_TIMEOUT_SECS)
            .post(&self.usage_url(event.workspace_id))
            .header(API_KEY_HEADER, &self.api_key)
            .send_json(event)
            .map_err(|e| ReelError::UsageRecord(format!("OpenServ request failed: {}", e)))?;

        ensure_success(&mut response, "OpenServ", ReelError::UsageRecord)?;
        let body = response.body_mut().read_to_string().unwrap_or_default();
        debug!("Usage record accepted: {}", body);
        Ok(())
    }
}

/// Assemble a `multipart/form-data` body with the `path` field and the file part.
///
/// The path is written into header lines, so quotes and line breaks are refused.
pub fn multipart_body(boundary: &str, path: &str, file: &[u8]) -> Result<Vec<u8>> {
    if path.contains(['"', '\r', '\n']) {
        return Err(ReelError::Upload(format!(
            "Invalid upload path {:?}: quotes and line breaks are not allowed",
            path
        )));
    }

    let mut body = Vec::with_capacity(file.len() + 512);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"path\"\r\n\r\n{p}\r\n",
            b = boundary,
            p = path
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{p}\"\r\nContent-Type: video/mp4\r\n\r\n",
            b = boundary,
            p = path
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    Ok(body)
}

/// Pull the file URL out of an upload response
pub fn parse_upload_response(value: serde_json::Value) -> Result<StoredFile> {
    match value.get("url").and_then(|u| u.as_str()) {
        Some(url) if !url.is_empty() => Ok(StoredFile {
            url: url.to_string(),
        }),
        _ => Err(ReelError::Upload(format!(
            "Upload response has no url: {}",
            value
        ))),
    }
}
