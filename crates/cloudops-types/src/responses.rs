//! Response payloads returned by the control plane

use serde::{Deserialize, Serialize};

/// `GET /workflows/{name}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub name: String,
    pub status: String,
    /// Creation time as reported by the control plane
    #[serde(default)]
    pub created: String,
    /// Completion time; empty while the workflow is still running
    #[serde(default)]
    pub finished: String,
}

/// `GET /projects/{project}/targets/{target}/workflows`
pub type WorkflowList = Vec<String>;

/// `GET /workflows/{name}/logs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default)]
    pub logs: Vec<String>,
}

/// `POST /projects/{project}/targets/{target}/operations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOperationResult {
    pub workflow_name: String,
}

pub type DiffResult = TargetOperationResult;
pub type SyncResult = TargetOperationResult;

/// `POST /workflows`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteWorkflowResult {
    pub workflow_name: String,
}
