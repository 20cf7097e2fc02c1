//! The generate → poll → fetch → transfer → bill pipeline
//!
//! Stages run strictly in order and each consumes the previous stage's
//! output. A failure stops every later stage; nothing already done is
//! rolled back.

use log::{error, info, warn};
use reel_core::{ReelError, Result};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::ReelConfig;
use crate::context::InvocationContext;
use crate::extract::extract_locator;
use crate::platform::{create_ledger, create_storage};
use crate::poll::{poll_until_done, CancelToken, PollPolicy};
use crate::provider::{GenerationRequest, JobStatus, VideoProvider};
use crate::providers::create_provider;
use crate::storage::{asset_path, describe, now_millis, AssetStorage, UploadRequest, UploadedAsset};
use crate::usage::{BillingPolicy, UsageEvent, UsageLedger, UsageOutcome};

/// What a successful invocation delivered
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub asset: UploadedAsset,
    pub usage: UsageOutcome,
    pub poll_attempts: u32,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

/// One configured pipeline; safe to share across concurrent invocations
pub struct Pipeline {
    provider: Box<dyn VideoProvider>,
    storage: Box<dyn AssetStorage>,
    ledger: Box<dyn UsageLedger>,
    poll_policy: PollPolicy,
    billing: BillingPolicy,
    path_prefix: String,
}

impl Pipeline {
    /// Assemble a pipeline from explicit collaborators with default policies
    pub fn new(
        provider: Box<dyn VideoProvider>,
        storage: Box<dyn AssetStorage>,
        ledger: Box<dyn UsageLedger>,
    ) -> Self {
        Self {
            provider,
            storage,
            ledger,
            poll_policy: PollPolicy::default(),
            billing: BillingPolicy::default(),
            path_prefix: ReelConfig::default().platform.path_prefix,
        }
    }

    /// Build every collaborator from configuration.
    ///
    /// All required secrets are checked first, so a missing key fails
    /// before any network call.
    pub fn from_config(config: &ReelConfig) -> Result<Self> {
        config.require_secrets()?;
        let provider = create_provider(&config.provider.backend, config)?;
        let storage = create_storage(config)?;
        let ledger = create_ledger(config)?;

        Ok(Self::new(provider, storage, ledger)
            .with_poll_policy(config.polling.policy())
            .with_billing(config.billing.policy())
            .with_path_prefix(&config.platform.path_prefix))
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn with_billing(mut self, billing: BillingPolicy) -> Self {
        self.billing = billing;
        self
    }

    pub fn with_path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = prefix.to_string();
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one invocation end to end
    pub fn run(
        &self,
        prompt: &str,
        ctx: &InvocationContext,
        cancel: &CancelToken,
    ) -> Result<DeliveryReport> {
        let start = Instant::now();

        // Everything the later stages need from the context is resolved
        // up front so a bad context costs no provider work.
        let request = GenerationRequest::new(prompt)?;
        let workspace_id = ctx.require_workspace()?;
        let billing_target = ctx.billing_target()?;

        // 1. Submit
        cancel.check("submit")?;
        let handle = self.provider.submit(&request)?;
        info!("Submitted {} job {}", self.provider.name(), handle.id);

        // 2. Poll
        let outcome = poll_until_done(self.provider.as_ref(), handle, &self.poll_policy, cancel)?;

        // 3. Extract
        let status = JobStatus::from(outcome.handle);
        let locator = extract_locator(&status)?;

        // 4a. Fetch
        cancel.check("fetch")?;
        let bytes = self.provider.fetch(locator)?;
        info!("Fetched {} bytes", bytes.len());

        // 4b. Upload
        cancel.check("upload")?;
        let path = asset_path(&self.path_prefix, now_millis());
        let (content_hash, size_bytes) = describe(&bytes);
        let stored = self.storage.upload(UploadRequest {
            workspace_id,
            path: path.clone(),
            file: bytes,
        })?;
        info!("Uploaded {} to workspace {}: {}", path, workspace_id, stored.url);

        let asset = UploadedAsset {
            path,
            url: stored.url,
            content_hash,
            size_bytes,
        };

        // 5. Record usage
        let usage = match billing_target {
            Some((task_id, workspace_id)) => {
                let event = UsageEvent::for_task(task_id, workspace_id, self.billing.service_cost);
                self.record_usage(&event, &asset)?
            }
            None => {
                info!("Action is '{}', usage not recorded", ctx.action_type);
                UsageOutcome::Skipped
            }
        };

        Ok(DeliveryReport {
            asset,
            usage,
            poll_attempts: outcome.attempts,
            elapsed: start.elapsed(),
        })
    }

    fn record_usage(&self, event: &UsageEvent, asset: &UploadedAsset) -> Result<UsageOutcome> {
        match self.ledger.record(event) {
            Ok(()) => {
                info!(
                    "Recorded usage for task {} (cost {})",
                    event.task_id, event.service_cost
                );
                Ok(UsageOutcome::Recorded)
            }
            Err(e) if self.billing.fail_on_error => {
                error!("Usage record failed after delivering {}: {}", asset.url, e);
                Err(e)
            }
            Err(e) => {
                error!(
                    "Usage record failed for task {}, delivery of {} kept: {}",
                    event.task_id, asset.url, e
                );
                Ok(UsageOutcome::Failed(e.to_string()))
            }
        }
    }
}

/// Log a failed invocation with its error kind
pub fn log_failure(err: &ReelError) {
    match err {
        ReelError::Cancelled(_) => warn!("Invocation cancelled: {}", err),
        _ => error!("Invocation failed ({}): {}", err.kind(), err),
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
