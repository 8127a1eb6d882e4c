//! Error taxonomy for the integration pipelines.

use nexio_core::Platform;
use thiserror::Error;

/// Result type alias for nexio-connect operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type covering the OAuth, fetch, and transfer phases.
///
/// OAuth-phase errors surface immediately to the user; fetch-phase
/// errors abort the whole multi-page fetch; transfer-phase errors
/// abort the batch loop, leaving prior batches committed.
#[derive(Debug, Error)]
pub enum Error {
    /// The platform reported an OAuth error on the callback.
    #[error("authorization denied by platform: {reason}")]
    AuthorizationDenied { reason: String },

    /// Returned state blob was missing, undecodable, or did not match
    /// the stored one.
    #[error("OAuth state does not match: {reason}")]
    StateMismatch { reason: String },

    /// No stored state for this flow; expired or never issued.
    #[error("OAuth state is invalid or has expired")]
    StateExpiredOrInvalid,

    /// The token endpoint returned a non-success response.
    #[error("token exchange failed with status {status}: {body}")]
    TokenExchangeFailed { status: u16, body: String },

    /// No cached credentials for this user/org pair.
    #[error("no credentials found")]
    CredentialsNotFound,

    /// A listing endpoint returned a non-success response.
    #[error("upstream fetch failed with status {status}: {body}")]
    UpstreamFetchError { status: u16, body: String },

    /// No cached item list for this user/org pair.
    #[error("no cached data found for transfer")]
    NoCachedData,

    /// The destination write API reported a failure.
    #[error("destination write failed with status {status}: {message}")]
    DestinationWriteError { status: u16, message: String },

    /// The platform cannot act as a transfer destination.
    #[error("platform '{platform}' is not a supported transfer destination")]
    UnsupportedDestination { platform: Platform },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured endpoint is not a valid URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Invalid client configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// State mismatch with a reason for the log line.
    pub fn state_mismatch(reason: impl Into<String>) -> Self {
        Self::StateMismatch {
            reason: reason.into(),
        }
    }

    /// Authorization denied with the platform-reported reason.
    pub fn authorization_denied(reason: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            reason: reason.into(),
        }
    }

    /// Fetch failure capturing the upstream status and body.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamFetchError {
            status,
            body: body.into(),
        }
    }

    /// Destination failure capturing the reported status and message.
    pub fn destination(status: u16, message: impl Into<String>) -> Self {
        Self::DestinationWriteError {
            status,
            message: message.into(),
        }
    }

    /// Invalid configuration with a reason.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_status_and_body() {
        let error = Error::upstream(429, "slow down");
        assert!(error.to_string().contains("429"));
        assert!(error.to_string().contains("slow down"));
    }

    #[test]
    fn unsupported_destination_names_platform() {
        let error = Error::UnsupportedDestination {
            platform: Platform::HubSpot,
        };
        assert!(error.to_string().contains("hubspot"));
    }
}
