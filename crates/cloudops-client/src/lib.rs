//! CloudOps operation client
//!
//! Typed access to the workflow orchestration control plane: workflow
//! status, listings, buffered and streamed logs, diff and sync of project
//! targets, and workflow execution.
//!
//! Every operation takes a [`CancellationToken`]. Cancelling it before the
//! request is sent yields a request-build error; cancelling it while the
//! exchange is in flight yields a transport error. Diff and sync requests
//! are validated locally and never reach the network when invalid.
//!
//! ```no_run
//! use cloudops_client::{CancellationToken, CloudOpsClient, TargetOperationInput};
//!
//! # async fn run() -> cloudops_client::ClientResult<()> {
//! let client = CloudOpsClient::new("https://cloudops.example.com", "api-token")?;
//! let cancel = CancellationToken::new();
//!
//! let result = client
//!     .diff(
//!         &cancel,
//!         &TargetOperationInput {
//!             path: "infra/".into(),
//!             project_name: "demo".into(),
//!             sha: "abc123".into(),
//!             target_name: "staging".into(),
//!         },
//!     )
//!     .await?;
//! println!("started {}", result.workflow_name);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod error;

pub use client::{CloudOpsClient, TargetOperationInput};
pub use error::{ClientError, ClientResult, RequestBuildError, TransportError};
pub use tokio_util::sync::CancellationToken;
