//! NATS error to HTTP error conversion.
//!
//! Store failures never expose transport detail to the client; they all
//! surface as internal errors with debugging context.

use super::http_error::{Error as HttpError, ErrorKind};

impl<'a> From<nexio_nats::Error> for HttpError<'a> {
    fn from(nats_error: nexio_nats::Error) -> Self {
        match nats_error {
            nexio_nats::Error::Connection(_) => ErrorKind::InternalServerError
                .with_message("Service temporarily unavailable")
                .with_context("Unable to connect to the ephemeral store"),

            nexio_nats::Error::Timeout { .. } => ErrorKind::InternalServerError
                .with_message("Request timed out")
                .with_context("Store operation took too long to complete"),

            nexio_nats::Error::Serialization(_) => ErrorKind::InternalServerError
                .with_message("Data processing failed")
                .with_context("Failed to serialize data for storage"),

            nexio_nats::Error::InvalidConfig { .. } => ErrorKind::InternalServerError
                .with_message("Service misconfigured")
                .with_context("Store configuration is invalid"),

            nexio_nats::Error::Operation { ref operation, .. } => ErrorKind::InternalServerError
                .with_message(format!("Operation '{}' failed", operation))
                .with_context("The store operation could not be completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeout_conversion() {
        let nats_err = nexio_nats::Error::Timeout {
            timeout: Duration::from_secs(30),
        };
        let http_err: HttpError = nats_err.into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
        assert!(http_err.message().unwrap().contains("timed out"));
    }

    #[test]
    fn operation_conversion() {
        let nats_err = nexio_nats::Error::operation("kv_put", "stream offline");
        let http_err: HttpError = nats_err.into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
        assert!(http_err.message().unwrap().contains("kv_put"));
    }
}
