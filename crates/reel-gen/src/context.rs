//! Invocation context supplied by the host agent framework

use reel_core::{ReelError, Result, TaskId, WorkspaceId};
use serde::Deserialize;
use std::fmt;

/// What kind of host action triggered the invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    /// Executing an assigned task; the only billable action
    DoTask,
    /// Answering a chat message
    Respond,
    Other(String),
}

impl ActionType {
    pub fn parse(s: &str) -> Self {
        match s {
            "do-task" => ActionType::DoTask,
            "respond-chat-message" => ActionType::Respond,
            other => ActionType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionType::DoTask => "do-task",
            ActionType::Respond => "respond-chat-message",
            ActionType::Other(s) => s,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the invocation as seen by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub action_type: ActionType,
    pub task_id: Option<TaskId>,
    pub workspace_id: Option<WorkspaceId>,
}

impl InvocationContext {
    /// A task execution in `workspace_id`
    pub fn task(task_id: TaskId, workspace_id: WorkspaceId) -> Self {
        Self {
            action_type: ActionType::DoTask,
            task_id: Some(task_id),
            workspace_id: Some(workspace_id),
        }
    }

    /// A chat response in `workspace_id`; never billed
    pub fn chat(workspace_id: WorkspaceId) -> Self {
        Self {
            action_type: ActionType::Respond,
            task_id: None,
            workspace_id: Some(workspace_id),
        }
    }

    pub fn is_task_execution(&self) -> bool {
        self.action_type == ActionType::DoTask
    }

    /// The workspace to deliver into, or `MissingContext`
    pub fn require_workspace(&self) -> Result<WorkspaceId> {
        self.workspace_id.ok_or_else(|| {
            ReelError::MissingContext("no workspace id for file upload".to_string())
        })
    }

    /// The task to bill, if this invocation is billable.
    ///
    /// A task execution without a task id is `MissingContext`.
    pub fn billing_target(&self) -> Result<Option<(TaskId, WorkspaceId)>> {
        if !self.is_task_execution() {
            return Ok(None);
        }
        let task_id = self.task_id.ok_or_else(|| {
            ReelError::MissingContext("task execution without a task id".to_string())
        })?;
        Ok(Some((task_id, self.require_workspace()?)))
    }

    /// Build a context from the host's action object, e.g.
    /// `{"type": "do-task", "task": {"id": 42}, "workspace": {"id": 7}}`
    pub fn from_action_json(action: &serde_json::Value) -> Result<Self> {
        let raw: RawAction = serde_json::from_value(action.clone())
            .map_err(|e| ReelError::MissingContext(format!("malformed action: {}", e)))?;
        Ok(Self {
            action_type: ActionType::parse(&raw.action_type),
            task_id: raw.task.map(|t| TaskId(t.id)),
            workspace_id: raw.workspace.map(|w| WorkspaceId(w.id)),
        })
    }
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default)]
    task: Option<RawRef>,
    #[serde(default)]
    workspace: Option<RawRef>,
}

#[derive(Deserialize)]
struct RawRef {
    id: u64,
}
