use crate::errors::SyncError;
use async_trait::async_trait;
use elasticsearch::http::request::JsonBody;
use elasticsearch::{indices::IndicesCreateParts, BulkParts, Elasticsearch};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Videos,
    Channels,
    ChannelStats,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Videos, Table::Channels, Table::ChannelStats];

    pub fn index_name(self) -> &'static str {
        match self {
            Table::Videos => "videos",
            Table::Channels => "channels",
            Table::ChannelStats => "channel_stats",
        }
    }

    /// Natural key column; also used as the document `_id`.
    pub fn key_field(self) -> &'static str {
        match self {
            Table::Videos => "video_id",
            Table::Channels | Table::ChannelStats => "channel_id",
        }
    }
}

pub trait Row: Serialize {
    const TABLE: Table;

    fn key(&self) -> &str;
}

impl Row for crate::models::VideoRow {
    const TABLE: Table = Table::Videos;

    fn key(&self) -> &str {
        &self.video_id
    }
}

impl Row for crate::models::ChannelRow {
    const TABLE: Table = Table::Channels;

    fn key(&self) -> &str {
        &self.channel_id
    }
}

impl Row for crate::models::ChannelStatsRow {
    const TABLE: Table = Table::ChannelStats;

    fn key(&self) -> &str {
        &self.channel_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub body: Value,
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert-or-replace every document by key. All-or-nothing from the caller's view.
    async fn upsert(&self, table: Table, documents: Vec<Document>) -> Result<(), SyncError>;
}

/// Upserts `rows` into their table. An empty slice never reaches the store.
pub async fn upsert_rows<R: Row + Sync>(
    store: &dyn RowStore,
    rows: &[R],
) -> Result<usize, SyncError> {
    let table = R::TABLE;
    if rows.is_empty() {
        debug!("No rows for '{}', skipping upsert", table.index_name());
        return Ok(0);
    }

    let documents = rows
        .iter()
        .map(|row| {
            serde_json::to_value(row).map(|body| Document {
                key: row.key().to_string(),
                body,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SyncError::store(table.index_name(), e.to_string()))?;

    store.upsert(table, documents).await?;
    info!("Upserted {} rows into '{}'", rows.len(), table.index_name());
    Ok(rows.len())
}

pub struct ElasticsearchStore {
    client: Elasticsearch,
}

impl ElasticsearchStore {
    pub fn new(client: Elasticsearch) -> Self {
        ElasticsearchStore { client }
    }

    pub async fn create_indices(&self) {
        for table in Table::ALL {
            create_index(&self.client, table).await;
        }
    }
}

#[async_trait]
impl RowStore for ElasticsearchStore {
    async fn upsert(&self, table: Table, documents: Vec<Document>) -> Result<(), SyncError> {
        let index = table.index_name();
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({ "index": { "_id": document.key } }).into());
            body.push(document.body.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SyncError::store(index, e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SyncError::store(index, format!("{status}: {text}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| SyncError::store(index, e.to_string()))?;

        match first_bulk_error(&json) {
            Some(reason) => Err(SyncError::store(index, reason)),
            None => Ok(()),
        }
    }
}

/// First item-level failure reason of a `_bulk` response, if any item failed.
pub fn first_bulk_error(response: &Value) -> Option<String> {
    if !response["errors"].as_bool().unwrap_or(false) {
        return None;
    }

    let reason = response["items"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.as_object()?.values().next())
        .find_map(|action| {
            let error = action.get("error")?;
            Some(
                error["reason"]
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| error.to_string()),
            )
        });

    Some(reason.unwrap_or_else(|| "bulk request reported errors".to_string()))
}

async fn create_index(es_client: &Elasticsearch, table: Table) {
    let index = table.index_name();
    let mut properties = Map::new();
    properties.insert(table.key_field().to_string(), json!({ "type": "keyword" }));
    let create_index_body = json!({ "mappings": { "properties": properties } });

    match es_client
        .indices()
        .create(IndicesCreateParts::Index(index))
        .body(create_index_body)
        .send()
        .await
    {
        Ok(response) => {
            if response.status_code().is_success() {
                info!("Elasticsearch index '{index}' created.");
            } else {
                let response_text = response.text().await.unwrap_or_default();
                if response_text.contains("resource_already_exists_exception") {
                    info!("Elasticsearch index '{index}' already exists.");
                } else {
                    error!("Failed to create Elasticsearch index '{index}': {response_text}");
                }
            }
        }
        Err(e) => {
            error!("Failed to connect to Elasticsearch to create index '{index}': {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelStatsRow, VideoRow};
    use crate::test_support::MemoryStore;

    #[test]
    fn tables_map_to_indices_and_keys() {
        assert_eq!(Table::Videos.index_name(), "videos");
        assert_eq!(Table::Videos.key_field(), "video_id");
        assert_eq!(Table::Channels.index_name(), "channels");
        assert_eq!(Table::ChannelStats.index_name(), "channel_stats");
        assert_eq!(Table::ChannelStats.key_field(), "channel_id");
    }

    #[test]
    fn bulk_without_errors_is_clean() {
        let response = json!({ "took": 3, "errors": false, "items": [] });
        assert_eq!(first_bulk_error(&response), None);
    }

    #[test]
    fn bulk_error_reports_first_reason() {
        let response = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 201 } },
                { "index": { "_id": "b", "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [view_count]" } } },
                { "index": { "_id": "c", "status": 400,
                    "error": { "type": "other", "reason": "second" } } }
            ]
        });
        assert_eq!(
            first_bulk_error(&response).as_deref(),
            Some("failed to parse field [view_count]")
        );
    }

    #[test]
    fn bulk_error_without_items_still_fails() {
        let response = json!({ "errors": true });
        assert!(first_bulk_error(&response).is_some());
    }

    #[tokio::test]
    async fn empty_row_set_skips_the_store() {
        let store = MemoryStore::default();
        let rows: Vec<VideoRow> = Vec::new();

        let written = upsert_rows(&store, &rows).await.unwrap();

        assert_eq!(written, 0);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn upsert_is_keyed_and_replaces() {
        let store = MemoryStore::default();
        let first = vec![ChannelStatsRow {
            channel_id: "UC1".into(),
            subscriber_count: Some(10),
            view_count: None,
            video_count: None,
            captured_at: "t1".into(),
        }];
        let mut second = first.clone();
        second[0].subscriber_count = Some(20);

        upsert_rows(&store, &first).await.unwrap();
        upsert_rows(&store, &second).await.unwrap();

        let rows = store.rows(Table::ChannelStats);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["subscriber_count"], 20);
        assert_eq!(store.calls(), vec![(Table::ChannelStats, 1), (Table::ChannelStats, 1)]);
    }

    #[tokio::test]
    async fn store_failure_surfaces_message() {
        let store = MemoryStore::failing_on(Table::Videos);
        let rows = vec![VideoRow {
            video_id: "v".into(),
            title: "t".into(),
            published_at: None,
        }];

        let err = upsert_rows(&store, &rows).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to upsert videos: store unavailable");
    }
}
