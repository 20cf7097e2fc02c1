//! Reel Gen - prompt-to-video delivery pipeline
//!
//! Submits a text prompt to a video generation provider (Veo), polls the
//! job to completion, downloads the result, uploads it into the caller's
//! workspace and records a flat-rate usage event for billed tasks.

pub mod capability;
pub mod config;
pub mod context;
pub mod extract;
mod http;
pub mod pipeline;
pub mod platform;
pub mod poll;
pub mod provider;
pub mod providers;
pub mod storage;
pub mod usage;

pub use capability::{GenerateVideoCapability, CAPABILITY_NAME};
pub use config::{PlatformBackend, ReelConfig};
pub use context::{ActionType, InvocationContext};
pub use pipeline::{DeliveryReport, Pipeline};
pub use poll::{CancelToken, PollPolicy};
pub use provider::{
    AspectRatio, AssetBytes, GenerationRequest, JobHandle, JobStatus, PersonPolicy, VideoProvider,
};
pub use storage::{AssetStorage, UploadedAsset};
pub use usage::{BillingPolicy, UsageEvent, UsageLedger, UsageOutcome, DEFAULT_SERVICE_COST};
