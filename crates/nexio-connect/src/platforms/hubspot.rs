//! HubSpot CRM listing client.
//!
//! Walks `/crm/v3/objects/companies` and `/crm/v3/objects/contacts`
//! with cursor pagination and normalizes both object kinds.

use std::collections::BTreeMap;

use nexio_core::IntegrationItem;
use serde::Deserialize;

use crate::{Error, HttpConnector, Result, TRACING_TARGET_FETCH};

const DEFAULT_API_BASE: &str = "https://api.hubapi.com";

/// Records requested per page; HubSpot's maximum.
const PAGE_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<HubSpotRecord>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<PagingNext>,
}

#[derive(Debug, Deserialize)]
struct PagingNext {
    after: String,
}

#[derive(Debug, Deserialize)]
struct HubSpotRecord {
    id: String,
    #[serde(default)]
    properties: BTreeMap<String, Option<String>>,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    updated_at: Option<String>,
    #[serde(default)]
    archived: bool,
}

impl HubSpotRecord {
    fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Option::as_deref)
            .filter(|value| !value.is_empty())
    }

    /// Creation timestamp: the `createdate` property when present,
    /// otherwise the record envelope's `createdAt`.
    fn created(&self) -> Option<&str> {
        self.property("createdate").or(self.created_at.as_deref())
    }

    /// Last-modified timestamp: the `lastmodifieddate` property when
    /// present, otherwise the record envelope's `updatedAt`.
    fn modified(&self) -> Option<&str> {
        self.property("lastmodifieddate")
            .or(self.updated_at.as_deref())
    }
}

/// Client for listing HubSpot CRM objects.
pub struct HubSpotClient {
    connector: HttpConnector,
    access_token: String,
    api_base: String,
}

impl HubSpotClient {
    pub fn new(connector: HttpConnector, access_token: impl Into<String>) -> Self {
        Self {
            connector,
            access_token: access_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Fetches all companies followed by all contacts, each to
    /// pagination exhaustion.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_FETCH)]
    pub async fn fetch_items(&self) -> Result<Vec<IntegrationItem>> {
        let companies = self.fetch_object_pages("companies").await?;
        let contacts = self.fetch_object_pages("contacts").await?;

        tracing::info!(
            target: TRACING_TARGET_FETCH,
            companies = companies.len(),
            contacts = contacts.len(),
            "Fetched HubSpot records"
        );

        let mut items = Vec::with_capacity(companies.len() + contacts.len());
        items.extend(companies.iter().map(normalize_company));
        items.extend(contacts.iter().map(normalize_contact));
        Ok(items)
    }

    async fn fetch_object_pages(&self, object: &str) -> Result<Vec<HubSpotRecord>> {
        let url = format!("{}/crm/v3/objects/{object}", self.api_base);
        let mut records = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut request = self
                .connector
                .http()
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("limit", PAGE_LIMIT)]);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::upstream(status.as_u16(), body));
            }

            let page = response.json::<PagedResponse>().await?;
            tracing::debug!(
                target: TRACING_TARGET_FETCH,
                object = object,
                page_size = page.results.len(),
                "Fetched HubSpot page"
            );
            records.extend(page.results);

            match page.paging.and_then(|paging| paging.next) {
                Some(next) => after = Some(next.after),
                None => break,
            }
        }

        Ok(records)
    }
}

/// Normalizes a CRM contact. The `url` slot carries the email address.
fn normalize_contact(record: &HubSpotRecord) -> IntegrationItem {
    let full_name = format!(
        "{} {}",
        record.property("firstname").unwrap_or_default(),
        record.property("lastname").unwrap_or_default()
    );
    let name = match full_name.trim() {
        "" => format!("Contact {}", record.id),
        trimmed => trimmed.to_string(),
    };

    let mut item = IntegrationItem::new(&record.id, "contact", name)
        .with_timestamps(record.created(), record.modified())
        .with_visibility(!record.archived);
    if let Some(email) = record.property("email") {
        item = item.with_url(email);
    }
    item
}

/// Normalizes a CRM company. The `url` slot carries the domain.
fn normalize_company(record: &HubSpotRecord) -> IntegrationItem {
    let name = record
        .property("name")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Company {}", record.id));

    let mut item = IntegrationItem::new(&record.id, "company", name)
        .with_timestamps(record.created(), record.modified())
        .with_visibility(!record.archived);
    if let Some(domain) = record.property("domain") {
        item = item.with_url(domain);
    }
    item
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn record(id: &str, properties: &[(&str, &str)]) -> HubSpotRecord {
        HubSpotRecord {
            id: id.to_string(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            created_at: None,
            updated_at: None,
            archived: false,
        }
    }

    #[test]
    fn contact_name_joins_and_trims() {
        let item = normalize_contact(&record("1", &[("firstname", "Ada"), ("lastname", "Byron")]));
        assert_eq!(item.name, "Ada Byron");

        let item = normalize_contact(&record("2", &[("firstname", "Ada")]));
        assert_eq!(item.name, "Ada");
    }

    #[test]
    fn contact_without_names_gets_synthetic_fallback() {
        let item = normalize_contact(&record("42", &[("email", "a@b.dev")]));
        assert_eq!(item.name, "Contact 42");
        assert_eq!(item.url.as_deref(), Some("a@b.dev"));
        assert_eq!(item.item_type, "contact");
        assert!(item.visibility);
    }

    #[test]
    fn company_fallback_and_domain() {
        let item = normalize_company(&record("7", &[("domain", "acme.dev")]));
        assert_eq!(item.name, "Company 7");
        assert_eq!(item.url.as_deref(), Some("acme.dev"));

        let item = normalize_company(&record("8", &[("name", "Acme")]));
        assert_eq!(item.name, "Acme");
    }

    #[test]
    fn archived_record_is_not_visible() {
        let mut archived = record("9", &[]);
        archived.archived = true;
        assert!(!normalize_contact(&archived).visibility);
    }

    #[test]
    fn timestamp_properties_win_over_envelope_fields() {
        let mut with_both = record(
            "10",
            &[
                ("createdate", "2024-01-01T00:00:00Z"),
                ("lastmodifieddate", "2024-02-01T00:00:00Z"),
            ],
        );
        with_both.created_at = Some("2023-01-01T00:00:00Z".to_string());
        with_both.updated_at = Some("2023-02-01T00:00:00Z".to_string());

        let item = normalize_contact(&with_both);
        assert_eq!(item.creation_time, "2024-01-01T00:00:00Z".parse().ok());
        assert_eq!(
            item.last_modified_time,
            "2024-02-01T00:00:00Z".parse().ok()
        );

        let mut envelope_only = record("11", &[]);
        envelope_only.created_at = Some("2023-01-01T00:00:00Z".to_string());
        let item = normalize_company(&envelope_only);
        assert_eq!(item.creation_time, "2023-01-01T00:00:00Z".parse().ok());
    }

    fn contacts_page(start: usize, count: usize, next_after: Option<&str>) -> serde_json::Value {
        let results: Vec<_> = (start..start + count)
            .map(|n| {
                serde_json::json!({
                    "id": n.to_string(),
                    "properties": {"firstname": "User", "lastname": n.to_string()},
                })
            })
            .collect();
        match next_after {
            Some(after) => serde_json::json!({
                "results": results,
                "paging": {"next": {"after": after}},
            }),
            None => serde_json::json!({"results": results}),
        }
    }

    #[tokio::test]
    async fn pagination_walks_cursors_and_preserves_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
            })))
            .mount(&server)
            .await;

        // Cursor-less first page, then two cursor pages.
        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contacts"))
            .and(query_param("after", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contacts_page(100, 100, Some("p3"))))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contacts"))
            .and(query_param("after", "p3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contacts_page(200, 50, None)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contacts_page(0, 100, Some("p2"))))
            .mount(&server)
            .await;

        let client = HubSpotClient::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let items = client.fetch_items().await.unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(items[0].id, "0");
        assert_eq!(items[249].id, "249");
    }

    #[tokio::test]
    async fn upstream_failure_aborts_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired token"))
            .mount(&server)
            .await;

        let client = HubSpotClient::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let error = client.fetch_items().await.unwrap_err();
        match error {
            Error::UpstreamFetchError { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("expired token"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
