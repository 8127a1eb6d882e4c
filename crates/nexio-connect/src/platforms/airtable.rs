//! Airtable metadata listing client.
//!
//! Walks `GET /v0/meta/bases` with offset pagination and lists each
//! base's tables; bases normalize as directories, tables as children.

use nexio_core::IntegrationItem;
use serde::Deserialize;

use crate::{Error, HttpConnector, Result, TRACING_TARGET_FETCH};

const DEFAULT_API_BASE: &str = "https://api.airtable.com";

#[derive(Debug, Deserialize)]
struct BasesResponse {
    #[serde(default)]
    bases: Vec<AirtableBase>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableBase {
    id: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TablesResponse {
    #[serde(default)]
    tables: Vec<AirtableTable>,
}

#[derive(Debug, Deserialize)]
struct AirtableTable {
    id: String,
    name: Option<String>,
}

/// Client for listing Airtable bases and their tables.
pub struct AirtableClient {
    connector: HttpConnector,
    access_token: String,
    api_base: String,
}

impl AirtableClient {
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

    /// Lists all bases, then each base's tables, in listing order.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_FETCH)]
    pub async fn fetch_items(&self) -> Result<Vec<IntegrationItem>> {
        let bases = self.fetch_bases().await?;
        let mut items = Vec::new();

        for base in &bases {
            let base_name = base
                .name
                .clone()
                .unwrap_or_else(|| format!("Base {}", base.id));
            items.push(IntegrationItem::new(&base.id, "base", &base_name).with_directory(true));

            for table in self.fetch_tables(&base.id).await? {
                let table_name = table
                    .name
                    .unwrap_or_else(|| format!("Table {}", table.id));
                items.push(
                    IntegrationItem::new(table.id, "table", table_name)
                        .with_parent(&base.id, &base_name),
                );
            }
        }

        tracing::info!(
            target: TRACING_TARGET_FETCH,
            bases = bases.len(),
            items = items.len(),
            "Fetched Airtable metadata"
        );
        Ok(items)
    }

    async fn fetch_bases(&self) -> Result<Vec<AirtableBase>> {
        let url = format!("{}/v0/meta/bases", self.api_base);
        let mut bases = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .connector
                .http()
                .get(&url)
                .bearer_auth(&self.access_token);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::upstream(status.as_u16(), body));
            }

            let page = response.json::<BasesResponse>().await?;
            bases.extend(page.bases);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(bases)
    }

    async fn fetch_tables(&self, base_id: &str) -> Result<Vec<AirtableTable>> {
        let url = format!("{}/v0/meta/bases/{base_id}/tables", self.api_base);
        let response = self
            .connector
            .http()
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }

        Ok(response.json::<TablesResponse>().await?.tables)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn bases_paginate_and_tables_attach_to_parents() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/meta/bases"))
            .and(query_param("offset", "o2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bases": [{"id": "app2", "name": "Ops"}],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/meta/bases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bases": [{"id": "app1", "name": "CRM"}],
                "offset": "o2",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/meta/bases/app1/tables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tables": [{"id": "tbl1", "name": "Leads"}, {"id": "tbl2"}],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/meta/bases/app2/tables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tables": [],
            })))
            .mount(&server)
            .await;

        let client = AirtableClient::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        let items = client.fetch_items().await.unwrap();

        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["app1", "tbl1", "tbl2", "app2"]);

        assert!(items[0].directory);
        assert_eq!(items[1].parent_id.as_deref(), Some("app1"));
        assert_eq!(items[1].parent_path_or_name.as_deref(), Some("CRM"));
        assert_eq!(items[2].name, "Table tbl2");
    }

    #[tokio::test]
    async fn table_listing_failure_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/meta/bases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bases": [{"id": "app1", "name": "CRM"}],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/meta/bases/app1/tables"))
            .respond_with(ResponseTemplate::new(403).set_body_string("missing scope"))
            .mount(&server)
            .await;

        let client = AirtableClient::new(crate::HttpConnector::with_defaults().unwrap(), "tok")
            .with_api_base(server.uri());
        assert!(matches!(
            client.fetch_items().await,
            Err(Error::UpstreamFetchError { status: 403, .. })
        ));
    }
}
