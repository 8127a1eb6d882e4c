//! Connect-layer error to HTTP error conversion.
//!
//! OAuth validation failures map to client errors, cache misses to 404,
//! and upstream platform failures to 502.

use super::http_error::{Error as HttpError, ErrorKind};

impl<'a> From<nexio_connect::Error> for HttpError<'a> {
    fn from(error: nexio_connect::Error) -> Self {
        match error {
            // OAuth validation failures -> Bad Request
            nexio_connect::Error::AuthorizationDenied { ref reason } => ErrorKind::BadRequest
                .with_message("Authorization was denied")
                .with_context(format!("Platform reported: {reason}")),

            nexio_connect::Error::StateMismatch { ref reason } => ErrorKind::BadRequest
                .with_message("OAuth state validation failed")
                .with_context(reason.clone()),

            nexio_connect::Error::StateExpiredOrInvalid => ErrorKind::BadRequest
                .with_message("OAuth state is invalid or has expired")
                .with_context("Restart the authorization flow"),

            nexio_connect::Error::NoCachedData => ErrorKind::BadRequest
                .with_message("No cached data available for transfer")
                .with_context("Load items from the source platform first"),

            nexio_connect::Error::UnsupportedDestination { platform } => ErrorKind::BadRequest
                .with_message("Unsupported transfer destination")
                .with_resource(platform.as_str()),

            // Cache misses -> Not Found
            nexio_connect::Error::CredentialsNotFound => ErrorKind::NotFound
                .with_message("No credentials found")
                .with_resource("credentials"),

            // Upstream platform failures -> Bad Gateway
            nexio_connect::Error::TokenExchangeFailed { status, ref body } => ErrorKind::BadGateway
                .with_message("Token exchange failed")
                .with_context(format!("Upstream status {status}: {body}")),

            nexio_connect::Error::UpstreamFetchError { status, ref body } => ErrorKind::BadGateway
                .with_message("Failed to fetch items from platform")
                .with_context(format!("Upstream status {status}: {body}")),

            nexio_connect::Error::DestinationWriteError {
                status,
                ref message,
            } => ErrorKind::BadGateway
                .with_message("Failed to write items to destination")
                .with_context(format!("Destination status {status}: {message}")),

            nexio_connect::Error::Http(_) => ErrorKind::BadGateway
                .with_message("Platform request failed")
                .with_context("Could not reach the upstream platform"),

            // Everything else -> Internal Server Error
            nexio_connect::Error::Serialization(_) => ErrorKind::InternalServerError
                .with_message("Data processing failed")
                .with_context("Failed to serialize or deserialize platform data"),

            nexio_connect::Error::InvalidEndpoint(_) => ErrorKind::InternalServerError
                .with_message("Service misconfigured")
                .with_context("A configured platform endpoint is not a valid URL"),

            nexio_connect::Error::InvalidConfig { ref reason } => ErrorKind::InternalServerError
                .with_message("Service misconfigured")
                .with_context(reason.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn state_errors_are_bad_requests() {
        let http: HttpError = nexio_connect::Error::StateExpiredOrInvalid.into();
        assert_eq!(http.kind().status_code(), StatusCode::BAD_REQUEST);

        let http: HttpError = nexio_connect::Error::state_mismatch("bad blob").into();
        assert_eq!(http.kind(), ErrorKind::BadRequest);
        assert_eq!(http.context(), Some("bad blob"));
    }

    #[test]
    fn credentials_miss_is_not_found() {
        let http: HttpError = nexio_connect::Error::CredentialsNotFound.into();
        assert_eq!(http.kind().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(http.resource(), Some("credentials"));
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let http: HttpError = nexio_connect::Error::upstream(429, "rate limited").into();
        assert_eq!(http.kind().status_code(), StatusCode::BAD_GATEWAY);
        assert!(http.context().unwrap().contains("429"));

        let http: HttpError = nexio_connect::Error::TokenExchangeFailed {
            status: 400,
            body: "bad code".into(),
        }
        .into();
        assert_eq!(http.kind(), ErrorKind::BadGateway);
    }
}
