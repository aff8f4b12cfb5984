//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

/// Errors produced while running a node over a batch of items.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An item failed and continue-on-failure is off; the batch is aborted.
    #[error("item {item_index} failed: {source}")]
    ItemFailed {
        item_index: usize,
        #[source]
        source: NodeError,
    },
}

impl EngineError {
    /// The node error that stopped the batch.
    pub fn node_error(&self) -> &NodeError {
        match self {
            Self::ItemFailed { source, .. } => source,
        }
    }
}
