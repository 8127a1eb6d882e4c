//! Cross-platform transfer writers.
//!
//! A transfer takes a previously fetched item list and writes it into a
//! destination platform: Notion receives the list as appended paragraph
//! blocks, Airtable as created records. Failures surface as typed
//! errors; batches written before a failure stay committed.

use nexio_core::{IntegrationItem, Platform, TransferTargets};

use crate::{Error, HttpConnector, Result, TRACING_TARGET_TRANSFER};

const NOTION_API_BASE: &str = "https://api.notion.com";
const AIRTABLE_API_BASE: &str = "https://api.airtable.com";

const NOTION_VERSION: &str = "2022-06-28";

/// Notion caps rich-text content at 2000 characters per span.
const NOTION_CHUNK_CHARS: usize = 2000;

/// Airtable caps record creation at 10 records per request.
const AIRTABLE_BATCH_SIZE: usize = 10;

/// Writes the item list into the destination platform and returns the
/// destination's final raw response.
pub async fn transfer_items(
    connector: &HttpConnector,
    destination: Platform,
    targets: &TransferTargets,
    access_token: &str,
    items: &[IntegrationItem],
) -> Result<serde_json::Value> {
    match destination {
        Platform::Notion => {
            NotionWriter::new(connector.clone(), access_token)
                .write(&targets.notion_page_id, items)
                .await
        }
        Platform::Airtable => {
            AirtableWriter::new(connector.clone(), access_token)
                .write(&targets.airtable_base_id, &targets.airtable_table_id, items)
                .await
        }
        platform => Err(Error::UnsupportedDestination { platform }),
    }
}

/// Appends content blocks to a fixed Notion page.
pub struct NotionWriter {
    connector: HttpConnector,
    access_token: String,
    api_base: String,
}

impl NotionWriter {
    pub fn new(connector: HttpConnector, access_token: impl Into<String>) -> Self {
        Self {
            connector,
            access_token: access_token.into(),
            api_base: NOTION_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Serializes the items and appends them as paragraph blocks in a
    /// single children-append call.
    #[tracing::instrument(skip(self, items), target = TRACING_TARGET_TRANSFER)]
    pub async fn write(
        &self,
        page_id: &str,
        items: &[IntegrationItem],
    ) -> Result<serde_json::Value> {
        let payload = serde_json::to_string_pretty(items)?;
        let children: Vec<_> = chunk_text(&payload, NOTION_CHUNK_CHARS)
            .into_iter()
            .map(|chunk| {
                serde_json::json!({
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": {
                        "rich_text": [{"type": "text", "text": {"content": chunk}}],
                    },
                })
            })
            .collect();

        tracing::info!(
            target: TRACING_TARGET_TRANSFER,
            items = items.len(),
            blocks = children.len(),
            "Appending items to Notion page"
        );

        let url = format!("{}/v1/blocks/{page_id}/children", self.api_base);
        let response = self
            .connector
            .http()
            .patch(&url)
            .bearer_auth(&self.access_token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&serde_json::json!({ "children": children }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::destination(status.as_u16(), error_message(&body)));
        }

        Ok(response.json().await?)
    }
}

/// Creates records in a fixed Airtable table, in batches.
pub struct AirtableWriter {
    connector: HttpConnector,
    access_token: String,
    api_base: String,
}

impl AirtableWriter {
    pub fn new(connector: HttpConnector, access_token: impl Into<String>) -> Self {
        Self {
            connector,
            access_token: access_token.into(),
            api_base: AIRTABLE_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Creates one record per item, in listing order.
    ///
    /// The first failed batch aborts the loop; batches already written
    /// stay committed (there is no rollback API).
    #[tracing::instrument(skip(self, items), target = TRACING_TARGET_TRANSFER)]
    pub async fn write(
        &self,
        base_id: &str,
        table_id: &str,
        items: &[IntegrationItem],
    ) -> Result<serde_json::Value> {
        let url = format!("{}/v0/{base_id}/{table_id}", self.api_base);
        let mut last_response = serde_json::json!({ "records": [] });

        for (index, batch) in items.chunks(AIRTABLE_BATCH_SIZE).enumerate() {
            let records: Vec<_> = batch
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "fields": {
                            "Name": item.name,
                            "Type": item.item_type,
                            "Id": item.id,
                        },
                    })
                })
                .collect();

            let response = self
                .connector
                .http()
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&serde_json::json!({ "records": records }))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(
                    target: TRACING_TARGET_TRANSFER,
                    batch = index,
                    status = status.as_u16(),
                    "Airtable batch failed, aborting transfer"
                );
                return Err(Error::destination(status.as_u16(), error_message(&body)));
            }

            last_response = response.json().await?;
        }

        tracing::info!(
            target: TRACING_TARGET_TRANSFER,
            items = items.len(),
            "Created Airtable records"
        );
        Ok(last_response)
    }
}

/// Splits text into chunks of at most `max_chars` characters, never
/// splitting inside a character.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Pulls `error.message` out of a destination error body, falling back
/// to a fixed message when the body is not the expected shape.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.pointer("/message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn items(count: usize) -> Vec<IntegrationItem> {
        (0..count)
            .map(|n| IntegrationItem::new(n.to_string(), "contact", format!("Contact {n}")))
            .collect()
    }

    #[test]
    fn chunking_respects_char_boundaries() {
        let text = "ab".repeat(1500); // 3000 chars
        let chunks = chunk_text(&text, NOTION_CHUNK_CHARS);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 1000);

        // Multi-byte characters count as one.
        let text = "é".repeat(2001);
        let chunks = chunk_text(&text, NOTION_CHUNK_CHARS);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "é");
    }

    #[test]
    fn chunking_empty_text_is_empty() {
        assert!(chunk_text("", NOTION_CHUNK_CHARS).is_empty());
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"message": "bad table"}}"#),
            "bad table"
        );
        assert_eq!(error_message(r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_message("<html>"), "Unknown error");
    }

    #[tokio::test]
    async fn notion_write_is_a_single_append() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/blocks/page1/children"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"object": "list", "results": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let writer = NotionWriter::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let response = writer.write("page1", &items(50)).await.unwrap();
        assert_eq!(response["object"], "list");
    }

    #[tokio::test]
    async fn airtable_batches_in_tens() {
        let server = MockServer::start().await;
        // 25 items means exactly 3 batches.
        Mock::given(method("POST"))
            .and(path("/v0/base1/table1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"records": []})),
            )
            .expect(3)
            .mount(&server)
            .await;

        let writer = AirtableWriter::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        writer.write("base1", "table1", &items(25)).await.unwrap();
    }

    #[tokio::test]
    async fn airtable_failure_aborts_remaining_batches() {
        let server = MockServer::start().await;
        // Second batch fails; the third is never attempted.
        Mock::given(method("POST"))
            .and(path("/v0/base1/table1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"records": []})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v0/base1/table1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "error": {"type": "INVALID_REQUEST", "message": "unknown field"},
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        let writer = AirtableWriter::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let error = writer.write("base1", "table1", &items(30)).await.unwrap_err();
        match error {
            Error::DestinationWriteError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "unknown field");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn hubspot_is_not_a_destination() {
        let connector = crate::HttpConnector::with_defaults().unwrap();
        let error = transfer_items(
            &connector,
            Platform::HubSpot,
            &TransferTargets::default(),
            "tok",
            &items(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(error, Error::UnsupportedDestination { .. }));
    }
}
