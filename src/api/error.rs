//! Transport error taxonomy.
//!
//! Every failure a backend call can produce collapses into one of four
//! cases, each already carrying the text a screen may show. Raw reqwest
//! errors never escape the `api` module.

/// Errors from backend calls. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No usable response: refused connection, DNS failure, dropped socket.
    /// The display text stays generic; `detail` is for logs only.
    #[error("Request failed. Please check your connection and try again.")]
    Network { detail: String },
    /// The backend answered outside 2xx. `message` is the body's `error`
    /// field verbatim when present, the operation's fallback otherwise.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// A 2xx answer whose body did not parse as expected.
    #[error("The server returned an unexpected response.")]
    Decode { detail: String },
    /// A local file could not be prepared for upload.
    #[error("Could not read file for upload: {detail}")]
    File { detail: String },
}

impl ApiError {
    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}
