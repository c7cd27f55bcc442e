use crate::utils::{deserialize_count, normalize_timestamp};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, FromForm, Response};
use std::io::Cursor;

// Documentation: https://developers.google.com/youtube/v3/docs/search/list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    pub id: Option<SearchItemId>,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub channel_id: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: Option<String>,
    pub title: Option<String>,
    pub published_at: Option<String>,
}

impl SearchItem {
    /// Channel id of a `type=channel` search hit; falls back to the snippet.
    pub fn channel_id(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(|id| id.channel_id.as_deref())
            .or_else(|| {
                self.snippet
                    .as_ref()
                    .and_then(|snippet| snippet.channel_id.as_deref())
            })
            .filter(|id| !id.is_empty())
    }

    pub fn video_id(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(|id| id.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

// Documentation: https://developers.google.com/youtube/v3/docs/channels/list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelResource {
    pub id: Option<String>,
    pub etag: Option<String>,
    pub snippet: Option<ChannelSnippet>,
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: Option<String>,
    pub custom_url: Option<String>,
    pub country: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

impl Thumbnails {
    pub fn best_url(&self) -> Option<String> {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .find_map(|thumb| thumb.url.clone())
    }
}

// Counts arrive as strings ("1234") from the API, sometimes as numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub subscriber_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub video_count: Option<u64>,
}

/// A channel found by discovery, merged from a search hit and its
/// `channels.list` detail record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelCandidate {
    pub id: String,
    pub title: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub country: Option<String>,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
    pub etag: Option<String>,
}

impl ChannelCandidate {
    pub fn from_resource(resource: ChannelResource) -> Option<Self> {
        let id = resource.id.filter(|id| !id.is_empty())?;
        let snippet = resource.snippet.unwrap_or_default();
        let statistics = resource.statistics.unwrap_or_default();

        Some(ChannelCandidate {
            id,
            title: snippet.title.unwrap_or_default(),
            custom_url: snippet.custom_url,
            thumbnail_url: snippet.thumbnails.and_then(|t| t.best_url()),
            country: snippet.country,
            subscriber_count: statistics.subscriber_count,
            view_count: statistics.view_count,
            video_count: statistics.video_count,
            etag: resource.etag,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub published_at: Option<String>,
}

impl VideoRecord {
    pub fn from_search_item(item: &SearchItem) -> Option<Self> {
        let video_id = item.video_id()?.to_string();
        let snippet = item.snippet.clone().unwrap_or_default();

        Some(VideoRecord {
            video_id,
            title: snippet.title.unwrap_or_default(),
            published_at: snippet.published_at.as_deref().map(normalize_timestamp),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoRow {
    pub video_id: String,
    pub title: String,
    pub published_at: Option<String>,
}

impl From<VideoRecord> for VideoRow {
    fn from(record: VideoRecord) -> Self {
        VideoRow {
            video_id: record.video_id,
            title: record.title,
            published_at: record.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChannelRow {
    pub channel_id: String,
    pub title: String,
    pub custom_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub country: Option<String>,
    pub etag: Option<String>,
}

impl From<&ChannelCandidate> for ChannelRow {
    fn from(channel: &ChannelCandidate) -> Self {
        ChannelRow {
            channel_id: channel.id.clone(),
            title: channel.title.clone(),
            custom_url: channel.custom_url.clone(),
            thumbnail_url: channel.thumbnail_url.clone(),
            country: channel.country.clone(),
            etag: channel.etag.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChannelStatsRow {
    pub channel_id: String,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
    pub captured_at: String,
}

impl ChannelStatsRow {
    pub fn from_candidate(channel: &ChannelCandidate, captured_at: &str) -> Self {
        ChannelStatsRow {
            channel_id: channel.id.clone(),
            subscriber_count: channel.subscriber_count,
            view_count: channel.view_count,
            video_count: channel.video_count,
            captured_at: captured_at.to_string(),
        }
    }
}

#[derive(Debug, FromForm)]
pub struct SubscriberBoundsQuery {
    #[field(name = "minSubscribers")]
    pub min_subscribers: Option<String>,
    #[field(name = "maxSubscribers")]
    pub max_subscribers: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoSyncResponse {
    pub inserted: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: Status,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status: Status, error: impl Into<String>) -> Self {
        ErrorResponse {
            status,
            error: error.into(),
        }
    }

    pub fn server_error(error: impl Into<String>) -> Self {
        Self::new(Status::InternalServerError, error)
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
