use thiserror::Error;

/// Failure to obtain any response envelope at all.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport closed")]
    Closed,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl TransportError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        TransportError::Http {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }
}

/// Everything that can go wrong with a single command, as seen by a panel.
///
/// An empty success is not represented here: it decodes to an empty payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection problem: {0}")]
    Transport(String),

    #[error("{0}")]
    Server(String),

    #[error("Unexpected response data: {0}")]
    MalformedPayload(String),
}
