//! Supported third-party platforms.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A third-party platform that can act as an item source, an OAuth
/// provider, and (except HubSpot) a transfer destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum Platform {
    HubSpot,
    Notion,
    Airtable,
}

impl Platform {
    /// Returns the lowercase identifier used in routes and store keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HubSpot => "hubspot",
            Self::Notion => "notion",
            Self::Airtable => "airtable",
        }
    }

    /// Whether items fetched from another platform can be written into
    /// this one.
    #[must_use]
    pub fn supports_transfer_destination(self) -> bool {
        matches!(self, Self::Notion | Self::Airtable)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        for platform in Platform::iter() {
            let parsed = Platform::from_str(platform.as_str()).unwrap();
            assert_eq!(platform, parsed);
            assert_eq!(platform.to_string(), platform.as_str());
        }
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&Platform::HubSpot).unwrap();
        assert_eq!(json, "\"hubspot\"");
        let parsed: Platform = serde_json::from_str("\"airtable\"").unwrap();
        assert_eq!(parsed, Platform::Airtable);
    }

    #[test]
    fn hubspot_is_not_a_destination() {
        assert!(!Platform::HubSpot.supports_transfer_destination());
        assert!(Platform::Notion.supports_transfer_destination());
        assert!(Platform::Airtable.supports_transfer_destination());
    }
}
