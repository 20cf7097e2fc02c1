//! Caller-owned durable storage for delivered videos

use reel_core::{ContentHash, Result, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::provider::AssetBytes;

/// One file to place in a workspace
#[derive(Debug)]
pub struct UploadRequest {
    pub workspace_id: WorkspaceId,
    pub path: String,
    pub file: AssetBytes,
}

/// What the storage backend returns for a stored file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFile {
    pub url: String,
}

/// A delivered video as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedAsset {
    pub path: String,
    pub url: String,
    pub content_hash: String,
    pub size_bytes: u64,
}

/// Trait implemented by each storage backend (OpenServ, local directory)
pub trait AssetStorage: Send + Sync {
    fn name(&self) -> &str;

    /// Store the file and return a dereferenceable URL. Errors are `Upload`.
    fn upload(&self, request: UploadRequest) -> Result<StoredFile>;
}

/// Destination path for an upload: `{prefix}{millis}.mp4`
pub fn asset_path(prefix: &str, millis: u128) -> String {
    format!("{}{}.mp4", prefix, millis)
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Hash and size a buffer before it is handed to storage
pub(crate) fn describe(bytes: &AssetBytes) -> (String, u64) {
    (
        ContentHash::from_bytes(bytes.as_slice()).to_prefixed_hex(),
        bytes.len() as u64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_format() {
        assert_eq!(
            asset_path("veo3-video-", 1_718_000_000_123),
            "veo3-video-1718000000123.mp4"
        );
    }

    #[test]
    fn test_distinct_millis_give_distinct_paths() {
        let base = 1_718_000_000_000u128;
        let paths: std::collections::HashSet<String> =
            (0..1000).map(|i| asset_path("veo3-video-", base + i)).collect();
        assert_eq!(paths.len(), 1000);
    }

    #[test]
    fn test_now_millis_advances() {
        let a = now_millis();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(now_millis() > a);
    }

    #[test]
    fn test_describe() {
        let (hash, size) = describe(&AssetBytes::new(b"abc".to_vec()));
        assert_eq!(size, 3);
        assert_eq!(
            hash,
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
