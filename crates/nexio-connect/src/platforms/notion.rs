//! Notion search client.
//!
//! Walks `POST /v1/search` with cursor pagination and normalizes the
//! two record shapes the search API returns, tagged by `object`.

use std::collections::BTreeMap;

use nexio_core::IntegrationItem;
use serde::Deserialize;

use crate::{Error, HttpConnector, Result, TRACING_TARGET_FETCH};

const DEFAULT_API_BASE: &str = "https://api.notion.com";

/// Pinned API revision; newer revisions change the record shapes.
const NOTION_VERSION: &str = "2022-06-28";

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

/// Parent reference, e.g. `{"type": "page_id", "page_id": "..."}`.
#[derive(Debug, Deserialize)]
struct NotionParent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: BTreeMap<String, serde_json::Value>,
}

impl NotionParent {
    /// Resolves the parent reference, skipping workspace-level parents.
    fn reference(&self) -> Option<(&str, &str)> {
        if self.kind == "workspace" {
            return None;
        }
        let id = self.fields.get(&self.kind)?.as_str()?;
        Some((id, self.kind.as_str()))
    }
}

/// One property of a page; only title-bearing properties are of
/// interest, everything else deserializes to an empty shell.
#[derive(Debug, Deserialize)]
struct PageProperty {
    title: Option<Vec<RichText>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
enum NotionRecord {
    Database {
        id: String,
        #[serde(default)]
        title: Vec<RichText>,
        parent: Option<NotionParent>,
        created_time: Option<String>,
        last_edited_time: Option<String>,
        url: Option<String>,
        #[serde(default)]
        archived: bool,
    },
    Page {
        id: String,
        #[serde(default)]
        properties: BTreeMap<String, PageProperty>,
        parent: Option<NotionParent>,
        created_time: Option<String>,
        last_edited_time: Option<String>,
        url: Option<String>,
        #[serde(default)]
        archived: bool,
    },
}

/// Client for listing Notion pages and databases via search.
pub struct NotionClient {
    connector: HttpConnector,
    access_token: String,
    api_base: String,
}

impl NotionClient {
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

    /// Searches the workspace to cursor exhaustion.
    ///
    /// Results the search schema does not cover are skipped, not
    /// fatal: the search API may return record kinds this client does
    /// not model.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_FETCH)]
    pub async fn fetch_items(&self) -> Result<Vec<IntegrationItem>> {
        let url = format!("{}/v1/search", self.api_base);
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = serde_json::json!({ "page_size": PAGE_SIZE });
            if let Some(start_cursor) = &cursor {
                body["start_cursor"] = serde_json::Value::String(start_cursor.clone());
            }

            let response = self
                .connector
                .http()
                .post(&url)
                .bearer_auth(&self.access_token)
                .header("Notion-Version", NOTION_VERSION)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::upstream(status.as_u16(), body));
            }

            let page = response.json::<SearchResponse>().await?;
            tracing::debug!(
                target: TRACING_TARGET_FETCH,
                page_size = page.results.len(),
                has_more = page.has_more,
                "Fetched Notion search page"
            );

            for result in page.results {
                match serde_json::from_value::<NotionRecord>(result) {
                    Ok(record) => items.push(normalize_record(&record)),
                    Err(error) => {
                        tracing::debug!(
                            target: TRACING_TARGET_FETCH,
                            %error,
                            "Skipping unmodeled search result"
                        );
                    }
                }
            }

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        tracing::info!(
            target: TRACING_TARGET_FETCH,
            items = items.len(),
            "Fetched Notion records"
        );
        Ok(items)
    }
}

/// First non-empty `plain_text` of a title rich-text array.
fn title_text(spans: &[RichText]) -> Option<&str> {
    spans
        .iter()
        .map(|span| span.plain_text.as_str())
        .find(|text| !text.is_empty())
}

fn normalize_record(record: &NotionRecord) -> IntegrationItem {
    match record {
        NotionRecord::Database {
            id,
            title,
            parent,
            created_time,
            last_edited_time,
            url,
            archived,
        } => {
            let name = format!("Database: {}", title_text(title).unwrap_or("Untitled"));
            finish_item(
                IntegrationItem::new(id, "database", name).with_directory(true),
                parent.as_ref(),
                created_time.as_deref(),
                last_edited_time.as_deref(),
                url.as_deref(),
                *archived,
            )
        }
        NotionRecord::Page {
            id,
            properties,
            parent,
            created_time,
            last_edited_time,
            url,
            archived,
        } => {
            // Properties iterate in key order, so the recovered title
            // is deterministic even with several title-shaped fields.
            let title = properties
                .values()
                .filter_map(|property| property.title.as_deref())
                .find_map(title_text);
            let name = format!("Page: {}", title.unwrap_or("Untitled"));
            finish_item(
                IntegrationItem::new(id, "page", name),
                parent.as_ref(),
                created_time.as_deref(),
                last_edited_time.as_deref(),
                url.as_deref(),
                *archived,
            )
        }
    }
}

fn finish_item(
    mut item: IntegrationItem,
    parent: Option<&NotionParent>,
    created: Option<&str>,
    modified: Option<&str>,
    url: Option<&str>,
    archived: bool,
) -> IntegrationItem {
    if let Some((parent_id, kind)) = parent.and_then(NotionParent::reference) {
        item = item.with_parent(parent_id, kind);
    }
    item = item
        .with_timestamps(created, modified)
        .with_visibility(!archived);
    if let Some(url) = url {
        item = item.with_url(url);
    }
    item
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse(value: serde_json::Value) -> NotionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn database_title_and_directory() {
        let item = normalize_record(&parse(serde_json::json!({
            "object": "database",
            "id": "db1",
            "title": [{"plain_text": "CRM"}],
            "parent": {"type": "workspace", "workspace": true},
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-02-01T00:00:00.000Z",
            "url": "https://notion.so/db1",
        })));
        assert_eq!(item.name, "Database: CRM");
        assert!(item.directory);
        assert!(item.parent_id.is_none());
        assert!(item.creation_time.is_some());
    }

    #[test]
    fn page_title_recovered_from_properties() {
        let item = normalize_record(&parse(serde_json::json!({
            "object": "page",
            "id": "pg1",
            "properties": {
                "Status": {"select": {"name": "Done"}},
                "Name": {"title": [{"plain_text": "Roadmap"}]},
            },
            "parent": {"type": "database_id", "database_id": "db1"},
        })));
        assert_eq!(item.name, "Page: Roadmap");
        assert!(!item.directory);
        assert_eq!(item.parent_id.as_deref(), Some("db1"));
        assert_eq!(item.parent_path_or_name.as_deref(), Some("database_id"));
    }

    #[test]
    fn untitled_defaults() {
        let page = normalize_record(&parse(serde_json::json!({
            "object": "page",
            "id": "pg2",
            "properties": {},
        })));
        assert_eq!(page.name, "Page: Untitled");

        let database = normalize_record(&parse(serde_json::json!({
            "object": "database",
            "id": "db2",
            "title": [],
        })));
        assert_eq!(database.name, "Database: Untitled");
    }

    #[test]
    fn archived_page_is_not_visible() {
        let item = normalize_record(&parse(serde_json::json!({
            "object": "page",
            "id": "pg3",
            "properties": {},
            "archived": true,
        })));
        assert!(!item.visibility);
    }

    #[tokio::test]
    async fn search_paginates_and_skips_unmodeled_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .and(body_partial_json(serde_json::json!({"start_cursor": "c2"})))
            .and(header("Notion-Version", NOTION_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"object": "page", "id": "pg2", "properties": {}},
                ],
                "has_more": false,
                "next_cursor": null,
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"object": "database", "id": "db1", "title": [{"plain_text": "CRM"}]},
                    {"object": "comment", "id": "cm1"},
                    {"object": "page", "id": "pg1", "properties": {}},
                ],
                "has_more": true,
                "next_cursor": "c2",
            })))
            .mount(&server)
            .await;

        let client = NotionClient::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let items = client.fetch_items().await.unwrap();

        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["db1", "pg1", "pg2"]);
    }
}
