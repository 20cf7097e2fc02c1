//! Local-directory platform
//!
//! Files land in `{root}/{workspace}/{path}` and usage records are appended
//! as JSON lines to `{root}/{workspace}/usage-records.jsonl`.

use reel_core::{ReelError, Result, WorkspaceId};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ReelConfig;
use crate::storage::{AssetStorage, StoredFile, UploadRequest};
use crate::usage::{UsageEvent, UsageLedger};

const USAGE_FILE: &str = "usage-records.jsonl";

/// A workspace store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &ReelConfig) -> Self {
        Self::new(&config.platform.root)
    }

    pub fn workspace_dir(&self, workspace_id: WorkspaceId) -> PathBuf {
        self.root.join(workspace_id.to_string())
    }

    pub fn usage_file(&self, workspace_id: WorkspaceId) -> PathBuf {
        self.workspace_dir(workspace_id).join(USAGE_FILE)
    }
}

impl AssetStorage for LocalWorkspace {
    fn name(&self) -> &str {
        "local"
    }

    fn upload(&self, request: UploadRequest) -> Result<StoredFile> {
        let file_name = Path::new(&request.path);
        if file_name.components().count() != 1 || request.path.contains("..") {
            return Err(ReelError::Upload(format!(
                "refusing nested destination path: {}",
                request.path
            )));
        }

        let dir = self.workspace_dir(request.workspace_id);
        let target = dir.join(file_name);
        let write = || -> std::io::Result<PathBuf> {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&target, request.file.as_slice())?;
            std::fs::canonicalize(&target)
        };
        let absolute = write().map_err(|e| {
            ReelError::Upload(format!("Failed to write {}: {}", target.display(), e))
        })?;

        Ok(StoredFile {
            url: format!("file://{}", absolute.display()),
        })
    }
}

impl UsageLedger for LocalWorkspace {
    fn name(&self) -> &str {
        "local"
    }

    fn record(&self, event: &UsageEvent) -> Result<()> {
        let mut line = serde_json::to_value(event)
            .map_err(|e| ReelError::UsageRecord(format!("Failed to encode usage: {}", e)))?;
        line["workspaceId"] = serde_json::json!(event.workspace_id);

        let path = self.usage_file(event.workspace_id);
        let append = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            writeln!(file, "{}", line)
        };
        append().map_err(|e| {
            ReelError::UsageRecord(format!("Failed to append {}: {}", path.display(), e))
        })
    }
}
