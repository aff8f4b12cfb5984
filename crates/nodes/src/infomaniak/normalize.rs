//! Response normalizer: provider envelope → ordered output records.
//!
//! The provider wraps results as `{ result: "success", data }` or
//! `{ result: "error", error: { code, message, description } }`. Responses
//! without the wrapper are passed through as the payload.

use serde_json::Value;

use crate::params::{is_truthy, scalar_to_string};
use crate::traits::OutputRecord;
use crate::NodeError;

const RESULT_FIELD: &str = "result";
const SUCCESS: &str = "success";
const ERROR: &str = "error";

const UNKNOWN_MESSAGE: &str = "Unknown error";
const UNKNOWN_CODE: &str = "N/A";

/// Turn a decoded response into output records tagged with `item_index`.
///
/// An array payload yields one record per element, in order; anything else
/// yields exactly one record.
pub fn normalize(response: Value, item_index: usize) -> Result<Vec<OutputRecord>, NodeError> {
    if let Some(error) = provider_error(&response) {
        return Err(error);
    }

    let records = match payload(response) {
        Value::Array(items) => items
            .into_iter()
            .map(|json| OutputRecord::new(json, item_index))
            .collect(),
        single => vec![OutputRecord::new(single, item_index)],
    };
    Ok(records)
}

/// `true` when the response is the provider's error envelope.
pub fn is_error_envelope(response: &Value) -> bool {
    response.get(RESULT_FIELD).and_then(Value::as_str) == Some(ERROR)
}

fn provider_error(response: &Value) -> Option<NodeError> {
    if !is_error_envelope(response) {
        return None;
    }
    let detail = response.get(ERROR);

    let message = truthy_field(detail, "description")
        .or_else(|| truthy_field(detail, "message"))
        .map(render)
        .unwrap_or_else(|| UNKNOWN_MESSAGE.to_owned());
    let code = truthy_field(detail, "code")
        .map(render)
        .unwrap_or_else(|| UNKNOWN_CODE.to_owned());

    Some(NodeError::ProviderApi { message, code })
}

fn truthy_field<'a>(detail: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    detail
        .and_then(|detail| detail.get(name))
        .filter(|value| is_truthy(value))
}

fn render(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| value.to_string())
}

/// Unwrap `data` from a success envelope; otherwise the response is the payload.
fn payload(response: Value) -> Value {
    match response {
        Value::Object(mut envelope)
            if envelope.get(RESULT_FIELD).and_then(Value::as_str) == Some(SUCCESS)
                && envelope.contains_key("data") =>
        {
            envelope.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
