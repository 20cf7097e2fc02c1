//! Completion polling and cooperative cancellation
//!
//! A submitted job is re-queried at a fixed interval until the provider
//! reports it done. The number of attempts is bounded so a job that never
//! finishes surfaces as `PollTimeout` instead of suspending forever.

use log::{debug, info};
use reel_core::{ReelError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::provider::{JobHandle, VideoProvider};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 180;

/// Longest uninterrupted sleep; cancellation is observed at this granularity
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Fixed-interval polling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Shared flag a host sets to abort a running invocation.
///
/// Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` if the token has been triggered
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(ReelError::Cancelled(stage.to_string()));
        }
        Ok(())
    }

    /// Sleep for `duration`, waking early with `Cancelled` if the token fires
    ///
    /// Measured as elapsed time from the start, so an arbitrarily large
    /// duration just waits for cancellation.
    pub fn sleep(&self, duration: Duration, stage: &str) -> Result<()> {
        let start = Instant::now();
        loop {
            self.check(stage)?;
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return Ok(());
            }
            std::thread::sleep((duration - elapsed).min(SLEEP_SLICE));
        }
    }
}

/// Terminal state of a polled job
#[derive(Debug)]
pub struct PollOutcome {
    pub handle: JobHandle,
    pub attempts: u32,
}

/// Poll until the job reports done.
///
/// A handle that is already done returns without any status query.
pub fn poll_until_done(
    provider: &dyn VideoProvider,
    handle: JobHandle,
    policy: &PollPolicy,
    cancel: &CancelToken,
) -> Result<PollOutcome> {
    let mut handle = handle;
    let mut attempts = 0u32;

    while !handle.done {
        if attempts >= policy.max_attempts {
            return Err(ReelError::PollTimeout { attempts });
        }

        cancel.check("poll")?;
        cancel.sleep(policy.interval, "poll")?;

        attempts += 1;
        handle = provider.poll(handle)?;
        debug!(
            "Poll {}/{} for {}: done={}",
            attempts, policy.max_attempts, handle.id, handle.done
        );
    }

    info!("Job {} finished after {} poll(s)", handle.id, attempts);
    Ok(PollOutcome { handle, attempts })
}
