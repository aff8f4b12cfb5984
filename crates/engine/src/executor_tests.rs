//! Tests for the item execution loop.
//!
//! These drive `ItemExecutor` with the real `InfomaniakNode` over a
//! `MockTransport`, so no network access is required.

use std::sync::Arc;

use serde_json::json;

use nodes::infomaniak::{InfomaniakNode, NodeConfig, ACCESS_TOKEN};
use nodes::mock::MockTransport;
use nodes::traits::ExecutionContext;
use nodes::{NodeError, OutputRecord, ParameterBag};

use crate::{EngineError, ExecutorConfig, ItemExecutor};

fn ctx() -> ExecutionContext {
    ExecutionContext::with_secret(ACCESS_TOKEN, "test-token")
}

fn node(transport: &Arc<MockTransport>) -> InfomaniakNode {
    InfomaniakNode::new(transport.clone(), NodeConfig::default())
}

fn profile_item() -> ParameterBag {
    ParameterBag::new()
        .with("resource", "account")
        .with("operation", "getProfile")
}

fn drive_item(drive_id: &str) -> ParameterBag {
    ParameterBag::new()
        .with("resource", "kdrive")
        .with("operation", "getDrive")
        .with("driveId", drive_id)
}

/// An item that fails validation before any request is sent.
fn broken_item() -> ParameterBag {
    ParameterBag::new()
        .with("resource", "kdrive")
        .with("operation", "getDrive")
}

#[tokio::test]
async fn records_follow_item_order() {
    let transport = Arc::new(MockTransport::scripted([
        Ok(json!({ "result": "success", "data": { "id": "a" } })),
        Ok(json!({ "result": "success", "data": [{ "id": "b1" }, { "id": "b2" }] })),
    ]));
    let executor = ItemExecutor::new(ExecutorConfig::default());
    let ctx = ctx();

    let result = executor
        .run(&node(&transport), &[drive_item("a"), drive_item("b")], &ctx)
        .await
        .expect("both items should succeed");

    assert_eq!(result.execution_id, ctx.execution_id);
    assert_eq!(
        result.records,
        vec![
            OutputRecord::new(json!({ "id": "a" }), 0),
            OutputRecord::new(json!({ "id": "b1" }), 1),
            OutputRecord::new(json!({ "id": "b2" }), 1),
        ]
    );
    assert!(result.failed_items.is_empty());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn failure_aborts_batch_by_default() {
    let transport = Arc::new(MockTransport::responding(
        json!({ "result": "success", "data": {} }),
    ));
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let err = executor
        .run(
            &node(&transport),
            &[profile_item(), broken_item(), profile_item()],
            &ctx(),
        )
        .await
        .unwrap_err();

    match &err {
        EngineError::ItemFailed { item_index, source } => {
            assert_eq!(*item_index, 1);
            assert_eq!(*source, NodeError::MissingParameter("driveId".into()));
        }
    }
    // The third item was never sent.
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn continue_on_fail_emits_error_record() {
    let transport = Arc::new(MockTransport::responding(
        json!({ "result": "success", "data": { "ok": true } }),
    ));
    let executor = ItemExecutor::new(ExecutorConfig {
        continue_on_fail: true,
    });

    let result = executor
        .run(
            &node(&transport),
            &[profile_item(), broken_item(), profile_item()],
            &ctx(),
        )
        .await
        .expect("continue-on-fail never aborts");

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.failed_items, vec![1]);
    assert_eq!(
        result.records[1],
        OutputRecord::new(
            json!({ "error": "missing required parameter 'driveId'" }),
            1
        )
    );
    assert_eq!(result.records[2].item_index, 2);
}

#[tokio::test]
async fn provider_error_message_reaches_error_record() {
    let transport = Arc::new(MockTransport::scripted([
        Ok(json!({ "result": "error", "error": { "code": "not_found", "description": "Drive not found" } })),
        Ok(json!({ "result": "success", "data": { "id": 2 } })),
    ]));
    let executor = ItemExecutor::new(ExecutorConfig {
        continue_on_fail: true,
    });

    let result = executor
        .run(&node(&transport), &[drive_item("1"), drive_item("2")], &ctx())
        .await
        .unwrap();

    assert_eq!(
        result.records[0].json,
        json!({ "error": "Infomaniak API error: Drive not found" })
    );
    assert_eq!(result.records[1], OutputRecord::new(json!({ "id": 2 }), 1));
}

#[tokio::test]
async fn transport_failure_is_wrapped_with_item_index() {
    let transport = Arc::new(MockTransport::failing("connection refused"));
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let err = executor
        .run(&node(&transport), &[profile_item()], &ctx())
        .await
        .unwrap_err();

    assert_eq!(
        err.node_error(),
        &NodeError::Transport("connection refused".into())
    );
    assert_eq!(
        err.to_string(),
        "item 0 failed: transport error: connection refused"
    );
}

#[tokio::test]
async fn empty_batch_produces_no_records() {
    let transport = Arc::new(MockTransport::responding(json!({})));
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let result = executor
        .run::<ParameterBag>(&node(&transport), &[], &ctx())
        .await
        .unwrap();

    assert!(result.records.is_empty());
    assert_eq!(transport.call_count(), 0);
}
