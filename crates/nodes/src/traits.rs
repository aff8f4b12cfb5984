//! The `ExecutableNode` trait: the contract every node must fulfil.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::params::ParameterAccessor;
use crate::NodeError;

/// Shared context passed to every node during execution.
///
/// Defined here (in the nodes crate) so both the engine and individual node
/// implementations can import it without a circular dependency.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// Decrypted secrets scoped to this run (e.g. `accessToken`).
    pub secrets: HashMap<String, String>,
}

impl ExecutionContext {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self {
            execution_id: uuid::Uuid::new_v4(),
            secrets,
        }
    }

    /// Convenience constructor for a context holding a single secret.
    pub fn with_secret(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(HashMap::from([(key.into(), value.into())]))
    }

    /// Look up a secret, failing with [`NodeError::MissingCredential`].
    pub fn secret(&self, key: &str) -> Result<&str, NodeError> {
        self.secrets
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| NodeError::MissingCredential(key.to_owned()))
    }
}

/// One unit of data emitted downstream, paired with the item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub json: Value,
    /// Index of the originating input item.
    pub item_index: usize,
}

impl OutputRecord {
    pub fn new(json: Value, item_index: usize) -> Self {
        Self { json, item_index }
    }
}

/// The core node trait.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Execute the node for a single item and return its output records.
    ///
    /// `params` resolves the item's parameters; `item_index` is carried into
    /// every record for host-side pairing.
    async fn execute(
        &self,
        item_index: usize,
        params: &dyn ParameterAccessor,
        ctx: &ExecutionContext,
    ) -> Result<Vec<OutputRecord>, NodeError>;
}
