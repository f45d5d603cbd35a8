//! Push relay errors.

/// Failure talking to the push relay.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Remote {
        url: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    /// Check if the request never got a response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// HTTP status of a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
