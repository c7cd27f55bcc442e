use crate::errors::SyncError;
use crate::models::{ChannelCandidate, ChannelResource, SearchListResponse};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Upper bound on channels collected by one discovery run.
pub const MAX_RESULTS: usize = 100;
/// Largest page (and detail batch) the upstream API accepts.
pub const CHUNK_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryQuery {
    pub keyword: String,
    pub region: String,
    pub language: String,
}

#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn search_page(
        &self,
        query: &DiscoveryQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, SyncError>;

    async fn channel_details(&self, ids: &[String]) -> Result<Vec<ChannelResource>, SyncError>;
}

/// Pages through the channel search until `cap` unique channels with detail
/// records are collected or the upstream runs out of pages.
///
/// Ids are deduplicated across pages, every page's new ids are resolved with a
/// single detail lookup, and the result keeps discovery order. Ids without a
/// detail record are dropped. Any upstream failure aborts the whole run.
pub async fn discover_channels<S>(
    source: &S,
    query: &DiscoveryQuery,
    cap: usize,
    chunk_size: usize,
) -> Result<Vec<ChannelCandidate>, SyncError>
where
    S: ChannelSource + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut channels: Vec<ChannelCandidate> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page_number = 0;

    loop {
        let remaining = cap.saturating_sub(channels.len());
        let page_size = chunk_size.min(remaining);
        if page_size == 0 {
            break;
        }

        page_number += 1;
        let page = source
            .search_page(query, page_size, page_token.as_deref())
            .await?;

        let mut batch: Vec<String> = Vec::new();
        for item in &page.items {
            if batch.len() >= page_size {
                break;
            }
            let Some(id) = item.channel_id() else {
                continue;
            };
            if seen.insert(id.to_string()) {
                batch.push(id.to_string());
            }
        }

        debug!(
            "Discovery page {page_number}: {} items, {} new channel ids",
            page.items.len(),
            batch.len()
        );

        if !batch.is_empty() {
            let mut details: HashMap<String, ChannelCandidate> = source
                .channel_details(&batch)
                .await?
                .into_iter()
                .filter_map(ChannelCandidate::from_resource)
                .map(|channel| (channel.id.clone(), channel))
                .collect();

            for id in &batch {
                match details.remove(id) {
                    Some(channel) => channels.push(channel),
                    None => debug!("No details for channel {id}, dropping"),
                }
            }
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
        if channels.len() >= cap {
            break;
        }
    }

    channels.truncate(cap);
    info!(
        "Discovered {} channels for '{}' over {page_number} pages",
        channels.len(),
        query.keyword
    );
    Ok(channels)
}
