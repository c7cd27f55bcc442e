//! Fakes shared by the unit tests.

use crate::errors::SyncError;
use crate::models::{ChannelResource, SearchListResponse};
use crate::services::discovery::{ChannelSource, DiscoveryQuery};
use crate::services::store::{Document, RowStore, Table};
use crate::services::youtube_client::YouTubeClient;
use crate::{AppState, SyncSettings};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub fn test_query() -> DiscoveryQuery {
    DiscoveryQuery {
        keyword: "rust".to_string(),
        region: "US".to_string(),
        language: "en".to_string(),
    }
}

pub fn test_settings() -> SyncSettings {
    SyncSettings {
        video_channel_id: "UCchan".to_string(),
        discovery: test_query(),
    }
}

pub fn test_state(youtube_base: Option<&str>, store: Option<Arc<dyn RowStore>>) -> AppState {
    AppState {
        youtube: youtube_base.map(|base| YouTubeClient::new("test-key", base).unwrap()),
        store,
        settings: test_settings(),
    }
}

/// `search.list` body for a `type=channel` query.
pub fn search_page(ids: &[&str], next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "kind": "youtube#searchResult",
                "id": { "kind": "youtube#channel", "channelId": id },
                "snippet": { "channelId": id, "title": format!("Channel {id}") }
            })
        })
        .collect();

    match next_page_token {
        Some(token) => json!({ "items": items, "nextPageToken": token }),
        None => json!({ "items": items }),
    }
}

/// `search.list` body for a `type=video` query.
pub fn video_search_page(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": { "kind": "youtube#video", "videoId": id },
                "snippet": { "title": format!("Video {id}"), "publishedAt": "2024-03-01T09:30:00Z" }
            })
        })
        .collect();
    json!({ "items": items })
}

fn channel_json(id: &str, subscribers: &str) -> Value {
    json!({
        "id": id,
        "etag": format!("etag-{id}"),
        "snippet": {
            "title": format!("Channel {id}"),
            "customUrl": format!("@{}", id.to_lowercase()),
            "country": "US",
            "thumbnails": { "high": { "url": format!("https://img.example/{id}.jpg") } }
        },
        "statistics": {
            "subscriberCount": subscribers,
            "viewCount": "50000",
            "videoCount": "42"
        }
    })
}

/// `channels.list` body with one resource per id.
pub fn channels_page(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids.iter().map(|id| channel_json(id, "1000")).collect();
    json!({ "items": items })
}

type Tables = HashMap<Table, BTreeMap<String, Value>>;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<(Table, usize)>>,
    fail_on: Option<Table>,
}

impl MemoryStore {
    pub fn failing_on(table: Table) -> Self {
        MemoryStore {
            fail_on: Some(table),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(Table, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self, table: Table) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn upsert(&self, table: Table, documents: Vec<Document>) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push((table, documents.len()));
        if self.fail_on == Some(table) {
            return Err(SyncError::store(table.index_name(), "store unavailable"));
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table).or_default();
        for document in documents {
            rows.insert(document.key, document.body);
        }
        Ok(())
    }
}

/// Serves scripted search pages; detail lookups come back in reverse order.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<(Vec<String>, Option<String>)>>,
    missing: Vec<String>,
    fail_search_at: Option<usize>,
    page_sizes: Mutex<Vec<usize>>,
    page_tokens: Mutex<Vec<Option<String>>>,
    detail_batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<(Vec<String>, Option<&str>)>) -> Self {
        ScriptedSource {
            pages: Mutex::new(
                pages
                    .into_iter()
                    .map(|(ids, token)| (ids, token.map(String::from)))
                    .collect(),
            ),
            missing: Vec::new(),
            fail_search_at: None,
            page_sizes: Mutex::new(Vec::new()),
            page_tokens: Mutex::new(Vec::new()),
            detail_batches: Mutex::new(Vec::new()),
        }
    }

    pub fn without_details(mut self, ids: &[&str]) -> Self {
        self.missing = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// The `call`-th search request (1-based) fails with a 403.
    pub fn failing_search_at(mut self, call: usize) -> Self {
        self.fail_search_at = Some(call);
        self
    }

    pub fn page_sizes(&self) -> Vec<usize> {
        self.page_sizes.lock().unwrap().clone()
    }

    pub fn page_tokens(&self) -> Vec<Option<String>> {
        self.page_tokens.lock().unwrap().clone()
    }

    pub fn detail_batches(&self) -> Vec<Vec<String>> {
        self.detail_batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSource for ScriptedSource {
    async fn search_page(
        &self,
        _query: &DiscoveryQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, SyncError> {
        let call = {
            let mut sizes = self.page_sizes.lock().unwrap();
            sizes.push(page_size);
            sizes.len()
        };
        self.page_tokens
            .lock()
            .unwrap()
            .push(page_token.map(String::from));

        if self.fail_search_at == Some(call) {
            return Err(SyncError::Upstream {
                endpoint: "search",
                status: 403,
                body: "forbidden".to_string(),
            });
        }

        let (ids, token) = self.pages.lock().unwrap().pop_front().unwrap_or_default();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        Ok(serde_json::from_value(search_page(&id_refs, token.as_deref())).unwrap())
    }

    async fn channel_details(&self, ids: &[String]) -> Result<Vec<ChannelResource>, SyncError> {
        self.detail_batches.lock().unwrap().push(ids.to_vec());

        Ok(ids
            .iter()
            .rev()
            .filter(|id| !self.missing.contains(id))
            .map(|id| serde_json::from_value(channel_json(id, "1000")).unwrap())
            .collect())
    }
}
