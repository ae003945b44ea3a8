use crate::domain::model::{Credential, RawResponse, RequestDescriptor};
use crate::utils::error::{Result, RunnerError};
use async_trait::async_trait;

/// One remote operation: how to build its request and how to read its reply.
pub trait ApiCall: Send + Sync {
    type Output: Send;

    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    fn describe(&self, credential: &Credential) -> Result<RequestDescriptor>;

    /// Called only for 2xx responses.
    fn interpret(&self, response: RawResponse) -> Result<Self::Output>;

    /// Called for every status outside 200-299.
    fn reject(&self, response: RawResponse) -> RunnerError {
        RunnerError::NonSuccessStatus {
            status: response.status,
            body: response.body,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse>;
}
