//! Per-platform listing clients and their normalizers.
//!
//! Each client walks the platform's pagination scheme to completion and
//! maps every native record into an [`IntegrationItem`]. Normalizers are
//! total: a record with nothing but an id still produces a valid item.

mod airtable;
mod hubspot;
mod notion;

pub use airtable::AirtableClient;
pub use hubspot::HubSpotClient;
pub use notion::NotionClient;

use nexio_core::{IntegrationItem, Platform};

use crate::{HttpConnector, Result};

/// Fetches and normalizes every listable item for the given platform.
///
/// Any non-success upstream response aborts the whole fetch; there are
/// no partial results.
pub async fn fetch_platform_items(
    connector: &HttpConnector,
    platform: Platform,
    access_token: &str,
) -> Result<Vec<IntegrationItem>> {
    match platform {
        Platform::HubSpot => {
            HubSpotClient::new(connector.clone(), access_token)
                .fetch_items()
                .await
        }
        Platform::Notion => {
            NotionClient::new(connector.clone(), access_token)
                .fetch_items()
                .await
        }
        Platform::Airtable => {
            AirtableClient::new(connector.clone(), access_token)
                .fetch_items()
                .await
        }
    }
}
