use crate::errors::SyncError;
use crate::models::{ChannelListResponse, ChannelResource, SearchListResponse, VideoRecord};
use crate::services::discovery::{ChannelSource, DiscoveryQuery};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Thin client for the YouTube Data API v3 endpoints used by the sync jobs.
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("YouTube API base URL is not a base URL: {base_url}");
        }

        Ok(YouTubeClient {
            http: Client::new(),
            api_key: api_key.into(),
            base_url,
        })
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
        }
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, SyncError> {
        debug!("GET YouTube {endpoint} ({})", url.path());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Upstream {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::decode(endpoint, e))
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    pub async fn search_channels(
        &self,
        query: &DiscoveryQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, SyncError> {
        let max_results = page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("type", "channel"),
            ("q", query.keyword.as_str()),
            ("regionCode", query.region.as_str()),
            ("relevanceLanguage", query.language.as_str()),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        self.get_json("search", self.endpoint_url("search", &params))
            .await
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/channels/list
    pub async fn channel_details(&self, ids: &[String]) -> Result<ChannelListResponse, SyncError> {
        let joined = ids.join(",");
        let max_results = ids.len().to_string();
        let params = [
            ("part", "snippet,statistics"),
            ("id", joined.as_str()),
            ("maxResults", max_results.as_str()),
        ];

        self.get_json("channels", self.endpoint_url("channels", &params))
            .await
    }

    /// Most recent uploads of one channel, newest first.
    pub async fn latest_videos(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<VideoRecord>, SyncError> {
        let max_results = max_results.to_string();
        let params = [
            ("part", "snippet"),
            ("channelId", channel_id),
            ("order", "date"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
        ];

        let page: SearchListResponse = self
            .get_json("search", self.endpoint_url("search", &params))
            .await?;

        Ok(page
            .items
            .iter()
            .filter_map(VideoRecord::from_search_item)
            .collect())
    }
}

#[async_trait]
impl ChannelSource for YouTubeClient {
    async fn search_page(
        &self,
        query: &DiscoveryQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, SyncError> {
        self.search_channels(query, page_size, page_token).await
    }

    async fn channel_details(&self, ids: &[String]) -> Result<Vec<ChannelResource>, SyncError> {
        Ok(YouTubeClient::channel_details(self, ids).await?.items)
    }
}
