//! Key-value bucket configuration traits.

use std::time::Duration;

/// Marker trait for KV bucket configuration.
///
/// This trait defines the configuration for a NATS KV bucket: its name,
/// description, and the `max_age` applied to every entry.
pub trait KvBucket: Clone + Send + Sync + 'static {
    /// Bucket name used in NATS KV.
    const NAME: &'static str;

    /// Human-readable description for the bucket.
    const DESCRIPTION: &'static str;

    /// Default TTL for entries in this bucket.
    /// Returns `None` for buckets where entries should not expire.
    const TTL: Option<Duration>;
}

/// Bucket for encoded OAuth CSRF state blobs.
///
/// Entries live for one redirect round-trip and are consumed on the
/// first successful callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AuthStatesBucket;

impl KvBucket for AuthStatesBucket {
    const NAME: &'static str = "auth_states";
    const DESCRIPTION: &'static str = "OAuth CSRF state blobs";
    const TTL: Option<Duration> = Some(Duration::from_secs(10 * 60)); // 10 minutes
}

/// Bucket for raw token-exchange payloads.
///
/// Consumed exactly once by credential retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CredentialsBucket;

impl KvBucket for CredentialsBucket {
    const NAME: &'static str = "credentials";
    const DESCRIPTION: &'static str = "Raw OAuth token payloads";
    const TTL: Option<Duration> = Some(Duration::from_secs(30 * 60)); // 30 minutes
}

/// Bucket for normalized integration item lists.
///
/// Carries an explicit TTL so abandoned fetch sessions cannot grow the
/// store without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ItemsBucket;

impl KvBucket for ItemsBucket {
    const NAME: &'static str = "integration_items";
    const DESCRIPTION: &'static str = "Normalized integration item lists";
    const TTL: Option<Duration> = Some(Duration::from_secs(60 * 60)); // 1 hour
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_states_bucket() {
        assert_eq!(AuthStatesBucket::NAME, "auth_states");
        assert_eq!(AuthStatesBucket::TTL, Some(Duration::from_secs(600)));
    }

    #[test]
    fn credentials_bucket() {
        assert_eq!(CredentialsBucket::NAME, "credentials");
        assert_eq!(CredentialsBucket::TTL, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn items_bucket_expires() {
        // The item cache must not be unbounded.
        assert!(ItemsBucket::TTL.is_some());
    }
}
