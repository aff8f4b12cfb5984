//! Image list input for the photo-maker operation.
//!
//! The parameter may hold a real JSON array, a string containing one, or a
//! single raw reference. Parsing never fails: anything that is not an array
//! becomes a one-element list.

use serde_json::Value;

/// Outcome of interpreting the `inputImages` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    /// A JSON array, given directly or encoded in a string.
    Structured(Vec<Value>),
    /// Anything else, kept verbatim.
    Fallback(Value),
}

impl ImageInput {
    pub fn parse(raw: Value) -> Self {
        match raw {
            Value::Array(items) => Self::Structured(items),
            Value::String(text) => match serde_json::from_str::<Vec<Value>>(&text) {
                Ok(items) => Self::Structured(items),
                Err(_) => Self::Fallback(Value::String(text)),
            },
            other => Self::Fallback(other),
        }
    }

    pub fn into_images(self) -> Vec<Value> {
        match self {
            Self::Structured(items) => items,
            Self::Fallback(single) => vec![single],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_array_string_is_structured() {
        let input = ImageInput::parse(json!(r#"["a","b"]"#));
        assert_eq!(input, ImageInput::Structured(vec![json!("a"), json!("b")]));
    }

    #[test]
    fn raw_string_falls_back_to_single_element() {
        let input = ImageInput::parse(json!("rawstring"));
        assert_eq!(input.into_images(), vec![json!("rawstring")]);
    }

    #[test]
    fn json_scalar_string_is_not_a_list() {
        assert_eq!(
            ImageInput::parse(json!("42")),
            ImageInput::Fallback(json!("42"))
        );
    }

    #[test]
    fn broken_json_falls_back() {
        let input = ImageInput::parse(json!(r#"["a","#));
        assert_eq!(input.into_images(), vec![json!(r#"["a","#)]);
    }

    #[test]
    fn array_values_pass_through() {
        let input = ImageInput::parse(json!(["x"]));
        assert_eq!(input.into_images(), vec![json!("x")]);
    }
}
