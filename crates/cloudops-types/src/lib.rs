//! CloudOps Types - request and response payloads
//!
//! Requests are immutable value objects. Each one exposes `validate()`,
//! an explicit ordered list of checks built from the
//! `cloudops-validation` rule registry. Responses are decoded from the
//! control plane's JSON.

#![deny(unsafe_code)]

pub mod requests;
pub mod responses;

pub use requests::{
    from_yaml, CreateGitWorkflow, CreateProject, CreateTarget, CreateWorkflow, ExecuteWorkflow,
    TargetOperation, TargetProperties, DIFF, MAX_POLICY_ARNS, SYNC, VAULT_CREDENTIAL_TYPE,
};
pub use responses::{
    DiffResult, ExecuteWorkflowResult, Logs, SyncResult, TargetOperationResult, WorkflowList,
    WorkflowStatus,
};
