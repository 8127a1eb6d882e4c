//! Key-value key types and traits.

use std::fmt;
use std::str::FromStr;

use nexio_core::Platform;

use crate::Error;

/// Marker trait for KV key types.
///
/// This trait defines how keys are formatted for storage in NATS KV.
pub trait KvKey: fmt::Debug + fmt::Display + FromStr + Clone + Send + Sync + 'static {}

/// Composite key scoping an OAuth flow to one `(platform, org, user)`
/// triple.
///
/// Rendered as `{platform}.{org_id}.{user_id}`. NATS KV keys treat `.`
/// as a token separator, so the identifiers themselves must not
/// contain dots; callers pass opaque user/org ids which satisfy this
/// in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub platform: Platform,
    pub org_id: String,
    pub user_id: String,
}

impl FlowKey {
    /// Creates a flow key for the given platform and identifiers.
    pub fn new(platform: Platform, org_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            platform,
            org_id: org_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl KvKey for FlowKey {}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.platform, self.org_id, self.user_id)
    }
}

impl FromStr for FlowKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '.');
        let (Some(platform), Some(org_id), Some(user_id)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::operation(
                "parse_flow_key",
                format!("expected platform.org.user, got: {s}"),
            ));
        };

        let platform = platform
            .parse::<Platform>()
            .map_err(|e| Error::operation("parse_flow_key", e.to_string()))?;

        Ok(Self {
            platform,
            org_id: org_id.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_key_roundtrip() {
        let key = FlowKey::new(Platform::HubSpot, "o1", "u1");
        assert_eq!(key.to_string(), "hubspot.o1.u1");
        let parsed: FlowKey = "hubspot.o1.u1".parse().unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn flow_key_rejects_short_form() {
        assert!("notion.only-org".parse::<FlowKey>().is_err());
        assert!("unknown.o1.u1".parse::<FlowKey>().is_err());
    }
}
