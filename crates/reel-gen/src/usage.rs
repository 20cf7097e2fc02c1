//! Flat-rate usage recording for billed task executions

use reel_core::{Result, TaskId, WorkspaceId};
use serde::Serialize;

/// Cost charged per delivered video, independent of length or compute
pub const DEFAULT_SERVICE_COST: u64 = 8 * 100 * 1_000_000;

/// Why usage was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Task,
}

/// A single usage record, written once per billed invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Addressed through the ledger URL, not the body
    #[serde(skip)]
    pub workspace_id: WorkspaceId,
    pub task_id: TaskId,
    pub trigger_type: TriggerType,
    pub service_cost: u64,
}

impl UsageEvent {
    pub fn for_task(task_id: TaskId, workspace_id: WorkspaceId, service_cost: u64) -> Self {
        Self {
            workspace_id,
            task_id,
            trigger_type: TriggerType::Task,
            service_cost,
        }
    }
}

/// How billing is applied after delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPolicy {
    pub service_cost: u64,
    /// When false, a ledger failure is logged and the delivery still succeeds
    pub fail_on_error: bool,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            service_cost: DEFAULT_SERVICE_COST,
            fail_on_error: false,
        }
    }
}

/// Result of the usage stage for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum UsageOutcome {
    Recorded,
    Skipped,
    Failed(String),
}

/// Trait implemented by each usage ledger backend (OpenServ, local file)
pub trait UsageLedger: Send + Sync {
    fn name(&self) -> &str;

    /// Post one usage record. Errors are `UsageRecord`.
    fn record(&self, event: &UsageEvent) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_cost() {
        assert_eq!(DEFAULT_SERVICE_COST, 800_000_000);
        assert_eq!(BillingPolicy::default().service_cost, DEFAULT_SERVICE_COST);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = UsageEvent::for_task(TaskId(42), WorkspaceId(7), DEFAULT_SERVICE_COST);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"taskId": 42, "triggerType": "task", "serviceCost": 800_000_000u64})
        );
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(UsageOutcome::Skipped).unwrap(),
            json!({"status": "skipped"})
        );
        assert_eq!(
            serde_json::to_value(UsageOutcome::Failed("HTTP 500".to_string())).unwrap(),
            json!({"status": "failed", "detail": "HTTP 500"})
        );
    }
}
