//! Node-level error type.

use thiserror::Error;

/// Errors returned while building, sending or normalizing a request for one item.
///
/// The host decides what a failure means for the run; the node never retries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeError {
    /// A required parameter is absent (or `null`) for this item.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// A parameter is present but unusable (wrong shape, unknown tag or selector).
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// No bearer token was supplied in the execution context.
    #[error("missing credential '{0}'")]
    MissingCredential(String),

    /// The provider answered with an error envelope.
    #[error("Infomaniak API error: {message}")]
    ProviderApi { message: String, code: String },

    /// Network or HTTP-layer failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),
}

impl NodeError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// `true` for failures caused by the item's own parameters.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidParameter { .. }
        )
    }
}
