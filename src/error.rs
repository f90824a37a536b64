//! Failure taxonomy of the record service.
//!
//! A lookup has three outcomes: the record, a soft "not found" message, or a
//! [`ServiceError`]. The soft case is a value, not an error, so callers can
//! tell a malformed reference from one that simply points at nothing.

use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::client::ClientError;

/// Result of a lookup that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad caller input. Raised before any request is sent.
    #[error("{0}")]
    InvalidArgument(String),

    /// The backend or the transport failed.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: ClientError,
    },

    /// Already in tool-protocol shape; surfaced unchanged.
    #[error("{}", .0.message)]
    Protocol(McpError),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Wrap a transport failure for `context`, passing protocol errors through.
    pub fn upstream(context: &'static str) -> impl FnOnce(ClientError) -> ServiceError {
        move |err| match err {
            ClientError::Protocol(inner) => ServiceError::Protocol(inner),
            source => ServiceError::Upstream { context, source },
        }
    }
}

impl From<ServiceError> for McpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(message) => McpError::invalid_params(message, None),
            upstream @ ServiceError::Upstream { .. } => {
                McpError::internal_error(upstream.to_string(), None)
            }
            ServiceError::Protocol(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn invalid_argument_maps_to_invalid_params() {
        let err: McpError = ServiceError::invalid("reference is required").into();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "reference is required");
    }

    #[test]
    fn upstream_error_carries_context_prefix() {
        let err = ServiceError::upstream("Failed to update feature")(ClientError::Server(
            "500 Internal Server Error: boom".to_string(),
        ));
        let err: McpError = err.into();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(
            err.message,
            "Failed to update feature: Server error: 500 Internal Server Error: boom"
        );
    }

    #[test]
    fn protocol_errors_are_not_rewrapped() {
        let original = McpError::new(ErrorCode(-32042), "quota exceeded", None);
        let err = ServiceError::upstream("Failed to fetch record")(ClientError::Protocol(
            original.clone(),
        ));
        let err: McpError = err.into();
        assert_eq!(err, original);
    }
}
