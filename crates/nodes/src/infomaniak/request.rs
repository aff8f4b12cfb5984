//! The request descriptor produced by the builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// HTTP verb of an outbound request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// GET and DELETE never carry a body.
    pub fn carries_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }
}

/// Everything needed to issue one provider call, minus origin and credentials.
///
/// Built fresh per item. The default value is the no-op descriptor (GET, empty
/// path) produced for unmatched operation keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub query: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub body: Map<String, Value>,
}

impl RequestDescriptor {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.path.is_empty()
    }

    /// The body as it goes on the wire: only for body-carrying methods, only if non-empty.
    pub fn wire_body(&self) -> Option<&Map<String, Value>> {
        (self.method.carries_body() && !self.body.is_empty()).then_some(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn noop_is_a_bare_get() {
        let noop = RequestDescriptor::noop();
        assert_eq!(noop.method, Method::Get);
        assert!(noop.is_noop());
        assert!(noop.wire_body().is_none());
    }

    #[test]
    fn wire_body_is_dropped_for_delete() {
        let mut descriptor = RequestDescriptor {
            method: Method::Delete,
            path: "/1/domain/1/dns/record/2".into(),
            ..Default::default()
        };
        descriptor.body.insert("ignored".into(), json!(true));
        assert!(descriptor.wire_body().is_none());

        descriptor.method = Method::Post;
        assert_eq!(descriptor.wire_body().unwrap()["ignored"], json!(true));
    }
}
