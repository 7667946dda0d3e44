use std::time::Duration;

use thiserror::Error;

/// Why a tool call failed. The `Display` form is the message handed back to
/// the calling agent.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Missing or malformed argument, caught before any request is sent.
    #[error("Error: {0}")]
    Validation(String),
    #[error("Error: 'action' parameter is required")]
    MissingAction,
    #[error("Error: Unknown action '{action}'. Available actions: {}", .available.join(", "))]
    UnknownAction {
        action: String,
        available: &'static [&'static str],
    },
    /// The backend answered with something other than 200. The body is kept verbatim.
    #[error("Error {operation}: {status} - {body}")]
    Remote {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("Network error {operation}: {source}")]
    Transport {
        operation: &'static str,
        source: TransportError,
    },
    /// A 200 response whose body did not have the expected shape.
    #[error("Error executing {resource} action: {source}")]
    Decode {
        resource: &'static str,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0}")]
    Connection(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_embeds_status_and_raw_body() {
        let err = ToolError::Remote {
            operation: "getting task",
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Error getting task: 404 - not found");
    }

    #[test]
    fn transport_error_names_the_operation() {
        let err = ToolError::Transport {
            operation: "listing files",
            source: TransportError::Timeout(Duration::from_secs(30)),
        };
        assert_eq!(
            err.to_string(),
            "Network error listing files: request timed out after 30s"
        );
    }
}
