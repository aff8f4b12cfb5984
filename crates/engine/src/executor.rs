//! Item execution loop.
//!
//! `ItemExecutor` is the host-side orchestrator:
//! 1. Iterates through the input items in order.
//! 2. Dispatches each one to the node via `ExecutableNode`.
//! 3. Appends the records it returns, keeping their item pairing.
//! 4. On failure either emits an error record and moves on
//!    (`continue_on_fail`) or aborts the batch.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use nodes::traits::ExecutionContext;
use nodes::{ExecutableNode, OutputRecord, ParameterAccessor};

use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Turn item failures into `{ "error": <message> }` records instead of
    /// aborting the batch.
    pub continue_on_fail: bool,
}

// ---------------------------------------------------------------------------
// Output of a completed run
// ---------------------------------------------------------------------------

/// The result of running a node over every item.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub execution_id: uuid::Uuid,
    /// Output records in item order.
    pub records: Vec<OutputRecord>,
    /// Indices of items that failed and were absorbed as error records.
    pub failed_items: Vec<usize>,
}

// ---------------------------------------------------------------------------
// ItemExecutor
// ---------------------------------------------------------------------------

/// Stateless driver that runs one node over a batch of items.
pub struct ItemExecutor {
    config: ExecutorConfig,
}

impl ItemExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run `node` once per item, sequentially.
    ///
    /// # Errors
    /// Returns [`EngineError::ItemFailed`] for the first failing item when
    /// `continue_on_fail` is off.
    #[instrument(skip_all, fields(execution_id = %ctx.execution_id, items = items.len()))]
    pub async fn run<P>(
        &self,
        node: &dyn ExecutableNode,
        items: &[P],
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, EngineError>
    where
        P: ParameterAccessor,
    {
        let mut records = Vec::with_capacity(items.len());
        let mut failed_items = Vec::new();

        for (item_index, params) in items.iter().enumerate() {
            match node.execute(item_index, params, ctx).await {
                Ok(output) => {
                    debug!(item_index, records = output.len(), "item succeeded");
                    records.extend(output);
                }

                Err(err) if self.config.continue_on_fail => {
                    warn!(item_index, "item failed, continuing: {err}");
                    records.push(OutputRecord::new(
                        json!({ "error": err.to_string() }),
                        item_index,
                    ));
                    failed_items.push(item_index);
                }

                Err(err) => {
                    error!(item_index, "item failed: {err}");
                    return Err(EngineError::ItemFailed {
                        item_index,
                        source: err,
                    });
                }
            }
        }

        info!(
            records = records.len(),
            failed = failed_items.len(),
            "execution {} finished",
            ctx.execution_id
        );

        Ok(ExecutionResult {
            execution_id: ctx.execution_id,
            records,
            failed_items,
        })
    }
}
