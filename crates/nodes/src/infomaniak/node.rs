//! `InfomaniakNode`: executes one provider call per item.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::builder::build_request;
use super::normalize::normalize;
use super::operation::OperationKey;
use super::request::{Method, RequestDescriptor};
use crate::params::ParameterAccessor;
use crate::traits::{ExecutableNode, ExecutionContext, OutputRecord};
use crate::transport::{HttpRequest, Transport};
use crate::NodeError;

/// Provider API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.infomaniak.com";

/// Secret holding the bearer token in [`ExecutionContext::secrets`].
pub const ACCESS_TOKEN: &str = "accessToken";

/// Path used to check that a token is accepted.
pub const CREDENTIAL_TEST_PATH: &str = "/1/profile";

/// Tuning knobs for the node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Origin the builder's paths are appended to.
    pub base_url: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// The Infomaniak integration node.
///
/// Stateless apart from its transport handle; safe to share across items.
pub struct InfomaniakNode {
    transport: Arc<dyn Transport>,
    config: NodeConfig,
}

impl InfomaniakNode {
    pub fn new(transport: Arc<dyn Transport>, config: NodeConfig) -> Self {
        Self { transport, config }
    }

    /// Attach origin and credentials to a descriptor.
    pub fn prepare(&self, descriptor: &RequestDescriptor, token: &str) -> HttpRequest {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            descriptor.path
        );
        HttpRequest {
            method: descriptor.method,
            url,
            headers: vec![
                ("Authorization".to_owned(), format!("Bearer {token}")),
                ("Content-Type".to_owned(), "application/json".to_owned()),
            ],
            query: descriptor.query.clone(),
            body: descriptor.wire_body().cloned().map(Value::Object),
        }
    }

    /// Check the token against the profile endpoint and return the profile.
    #[instrument(skip(self, ctx), fields(execution_id = %ctx.execution_id))]
    pub async fn test_credentials(&self, ctx: &ExecutionContext) -> Result<Value, NodeError> {
        let token = ctx.secret(ACCESS_TOKEN)?;
        let descriptor = RequestDescriptor {
            method: Method::Get,
            path: CREDENTIAL_TEST_PATH.to_owned(),
            ..Default::default()
        };
        let response = self.transport.send(self.prepare(&descriptor, token)).await?;
        let profile = normalize(response, 0)?
            .into_iter()
            .next()
            .map(|record| record.json)
            .unwrap_or(Value::Null);
        Ok(profile)
    }
}

#[async_trait]
impl ExecutableNode for InfomaniakNode {
    #[instrument(skip(self, params, ctx), fields(execution_id = %ctx.execution_id))]
    async fn execute(
        &self,
        item_index: usize,
        params: &dyn ParameterAccessor,
        ctx: &ExecutionContext,
    ) -> Result<Vec<OutputRecord>, NodeError> {
        let key = OperationKey::from_params(params)?;
        let descriptor = build_request(key, params)?;
        if descriptor.is_noop() {
            warn!(%key, "operation is not offered by this resource, sending bare request");
        }

        let token = ctx.secret(ACCESS_TOKEN)?;
        let request = self.prepare(&descriptor, token);
        debug!(%key, method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request).await?;
        let records = normalize(response, item_index)?;
        debug!(%key, records = records.len(), "normalized response");
        Ok(records)
    }
}
