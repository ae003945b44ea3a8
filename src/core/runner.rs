use crate::domain::model::{EnvCredential, Outcome, RequestDescriptor};
use crate::domain::ports::{ApiCall, Transport};
use crate::utils::error::Result;

pub struct ApiCallRunner<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiCallRunner<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Builds the request without sending it. Fails the same way `run` does
    /// when the credential is missing. The request is described with a masked
    /// credential, so the secret never reaches the returned text.
    pub fn preview<C: ApiCall>(&self, credential: &EnvCredential, call: &C) -> Result<String> {
        let token = credential.require()?.masked();
        let request = call.describe(&token)?;
        Ok(request.to_string())
    }

    /// Performs exactly one network call for `call`.
    pub async fn run<C: ApiCall>(&self, credential: &EnvCredential, call: &C) -> Outcome<C::Output> {
        let token = match credential.require() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("🔑 {}: {} not set, skipping request", call.name(), credential.var);
                return Err(e);
            }
        };
        tracing::info!("🔑 {}: token found ({})", call.name(), token.hint());

        let request: RequestDescriptor = call.describe(token)?;
        tracing::info!("🚀 {}: {} {}", call.name(), request.method(), request.url());

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ {}: request failed: {}", call.name(), e);
                return Err(e);
            }
        };

        if response.is_success() {
            tracing::info!("✅ {}: HTTP {}", call.name(), response.status);
            call.interpret(response)
        } else {
            tracing::error!("❌ {}: HTTP {}", call.name(), response.status);
            Err(call.reject(response))
        }
    }
}
