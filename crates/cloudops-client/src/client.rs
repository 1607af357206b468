//! HTTP client for the CloudOps control plane

use crate::error::{ClientError, ClientResult, RequestBuildError, TransportError};
use cloudops_config::{ClientConfig, LOCAL_SECURE_ENDPOINT};
use cloudops_types::{
    DiffResult, ExecuteWorkflow, ExecuteWorkflowResult, Logs, SyncResult, TargetOperation,
    TargetOperationResult, WorkflowList, WorkflowStatus, DIFF, SYNC,
};
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Longest response body excerpt written to logs
const LOG_BODY_LIMIT: usize = 512;

/// Input to a diff or sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOperationInput {
    pub path: String,
    pub project_name: String,
    pub sha: String,
    pub target_name: String,
}

/// Which responses count as success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Exactly 200
    Ok,
    /// Any 2xx
    Success,
}

impl Expect {
    fn accepts(self, status: StatusCode) -> bool {
        match self {
            Expect::Ok => status == StatusCode::OK,
            Expect::Success => status.is_success(),
        }
    }
}

/// HTTP client for the control plane.
///
/// Immutable after construction. Clones share the connection pool, so a
/// single client can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct CloudOpsClient {
    http: Client,
    endpoint: String,
    auth_token: String,
    /// Deadline for buffered calls; log streams never get one
    timeout: Option<Duration>,
}

impl CloudOpsClient {
    /// Create a new client. Certificate verification is disabled only when
    /// `endpoint` is exactly the local development endpoint.
    pub fn new(endpoint: &str, auth_token: impl Into<String>) -> ClientResult<Self> {
        Self::build(endpoint, auth_token.into(), None)
    }

    /// Create a client from loaded configuration.
    ///
    /// `timeout_secs` bounds connecting and every buffered call. A log
    /// stream is bounded only by its cancellation token.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::build(
            &config.endpoint,
            config.auth_token.clone(),
            Some(Duration::from_secs(config.timeout_secs)),
        )
    }

    /// Create a client over an existing transport
    pub fn with_http_client(http: Client, endpoint: &str, auth_token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
            timeout: None,
        }
    }

    fn build(endpoint: &str, auth_token: String, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout);
        }
        if endpoint == LOCAL_SECURE_ENDPOINT {
            tracing::warn!(endpoint, "local endpoint: tls certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(ClientError::Setup)?;

        Ok(Self {
            timeout,
            ..Self::with_http_client(http, endpoint, auth_token)
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ========== Workflow API ==========

    /// Get the status of a workflow
    pub async fn get_workflow_status(
        &self,
        cancel: &CancellationToken,
        workflow_name: &str,
    ) -> ClientResult<WorkflowStatus> {
        let url = self.url(&["workflows", workflow_name])?;
        self.get(cancel, &url, false).await
    }

    /// List workflow names for a project target
    pub async fn get_workflows(
        &self,
        cancel: &CancellationToken,
        project: &str,
        target: &str,
    ) -> ClientResult<WorkflowList> {
        let url = self.url(&["projects", project, "targets", target, "workflows"])?;
        self.get(cancel, &url, false).await
    }

    /// Get the buffered logs of a workflow
    pub async fn get_logs(
        &self,
        cancel: &CancellationToken,
        workflow_name: &str,
    ) -> ClientResult<Logs> {
        let url = self.url(&["workflows", workflow_name, "logs"])?;
        self.get(cancel, &url, true).await
    }

    /// Copy a workflow's log stream into `sink` as it arrives.
    ///
    /// Nothing is written unless the server answers 200. After that, a
    /// broken stream or sink surfaces as [`ClientError::Stream`] and bytes
    /// already written are left in place. The stream runs for as long as the
    /// server keeps it open; only `cancel` ends it early.
    pub async fn stream_logs<W>(
        &self,
        cancel: &CancellationToken,
        workflow_name: &str,
        sink: &mut W,
    ) -> ClientResult<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let url = self.url(&["workflows", workflow_name, "logstream"])?;
        let path = url.path();
        let request = self.request(cancel, Method::GET, &url, true)?;
        let response = self.send(cancel, request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let (_, body) = self.read_body(cancel, response).await?;
            return Err(self.unexpected_status(path, status, &body));
        }

        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(path, written, "log stream cancelled");
                    return Err(TransportError::Cancelled.into());
                }
                next = stream.next() => next,
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    return Err(ClientError::Stream {
                        status: status.as_u16(),
                        source: std::io::Error::other(e),
                    })
                }
                None => break,
            };

            sink.write_all(&chunk)
                .await
                .map_err(|source| ClientError::Stream {
                    status: status.as_u16(),
                    source,
                })?;
            written += chunk.len();
        }

        sink.flush().await.map_err(|source| ClientError::Stream {
            status: status.as_u16(),
            source,
        })?;
        tracing::debug!(path, written, "log stream complete");
        Ok(())
    }

    /// Submit a workflow execution.
    ///
    /// The request is sent as given; callers validate it beforehand.
    pub async fn execute_workflow(
        &self,
        cancel: &CancellationToken,
        input: &ExecuteWorkflow,
    ) -> ClientResult<ExecuteWorkflowResult> {
        let url = self.url(&["workflows"])?;
        self.post(cancel, &url, input).await
    }

    // ========== Target operation API ==========

    /// Submit a diff for a project target
    pub async fn diff(
        &self,
        cancel: &CancellationToken,
        input: &TargetOperationInput,
    ) -> ClientResult<DiffResult> {
        self.target_operation(cancel, input, DIFF).await
    }

    /// Submit a sync for a project target
    pub async fn sync(
        &self,
        cancel: &CancellationToken,
        input: &TargetOperationInput,
    ) -> ClientResult<SyncResult> {
        self.target_operation(cancel, input, SYNC).await
    }

    async fn target_operation(
        &self,
        cancel: &CancellationToken,
        input: &TargetOperationInput,
        operation_type: &str,
    ) -> ClientResult<TargetOperationResult> {
        let request = TargetOperation::new(&input.path, &input.sha, operation_type);
        if let Err(e) = request.validate() {
            tracing::debug!(
                operation = operation_type,
                rule = %e.rule(),
                error = %e,
                "target operation rejected"
            );
            return Err(e.into());
        }

        let url = self.url(&[
            "projects",
            &input.project_name,
            "targets",
            &input.target_name,
            "operations",
        ])?;
        self.post(cancel, &url, &request).await
    }

    // ========== Internal HTTP helpers ==========

    /// Endpoint plus `segments`, each percent-encoded as a single segment
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let invalid = |reason: String| RequestBuildError::InvalidUrl {
            url: self.endpoint.clone(),
            reason,
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("endpoint cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        cancel: &CancellationToken,
        method: Method,
        url: &Url,
        authorize: bool,
    ) -> ClientResult<RequestBuilder> {
        if cancel.is_cancelled() {
            return Err(RequestBuildError::Cancelled.into());
        }

        tracing::debug!(method = %method, path = url.path(), "building api request");
        let mut request = self.http.request(method, url.clone());
        if authorize {
            request = request.header(AUTHORIZATION, &self.auth_token);
        }
        Ok(request)
    }

    /// Apply the configured deadline to a call whose body is read whole
    fn buffered(&self, request: RequestBuilder) -> RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send(
        &self,
        cancel: &CancellationToken,
        request: RequestBuilder,
    ) -> ClientResult<Response> {
        if cancel.is_cancelled() {
            return Err(RequestBuildError::Cancelled.into());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
            result = request.send() => result.map_err(|e| TransportError::Http(e).into()),
        }
    }

    async fn read_body(
        &self,
        cancel: &CancellationToken,
        response: Response,
    ) -> ClientResult<(StatusCode, Vec<u8>)> {
        let status = response.status();
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled.into()),
            result = response.bytes() => result.map_err(|source| ClientError::ReadBody {
                status: status.as_u16(),
                source,
            })?,
        };
        Ok((status, body.to_vec()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        url: &Url,
        authorize: bool,
    ) -> ClientResult<T> {
        let request = self.buffered(self.request(cancel, Method::GET, url, authorize)?);
        self.exchange(cancel, url.path(), request, Expect::Ok).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        url: &Url,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body).map_err(RequestBuildError::Serialize)?;
        let request = self
            .request(cancel, Method::POST, url, true)?
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.exchange(cancel, url.path(), self.buffered(request), Expect::Success)
            .await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        request: RequestBuilder,
        expect: Expect,
    ) -> ClientResult<T> {
        let response = self.send(cancel, request).await?;
        let (status, body) = self.read_body(cancel, response).await?;

        if !expect.accepts(status) {
            return Err(self.unexpected_status(path, status, &body));
        }

        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }

    fn unexpected_status(&self, path: &str, status: StatusCode, body: &[u8]) -> ClientError {
        let body = String::from_utf8_lossy(body).into_owned();
        tracing::warn!(
            path,
            status = status.as_u16(),
            body = %truncate(&body, LOG_BODY_LIMIT),
            "unexpected status from control plane"
        );
        ClientError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        }
    }
}

/// Cut `s` to at most `limit` bytes on a character boundary
fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
