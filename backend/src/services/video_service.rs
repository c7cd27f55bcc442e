use crate::errors::SyncError;
use crate::models::VideoRow;
use crate::services::store::{upsert_rows, RowStore};
use crate::services::youtube_client::YouTubeClient;
use log::info;

/// Page size of the latest-uploads lookup; one page per sync.
pub const VIDEO_PAGE_SIZE: usize = 50;

/// Pulls the newest uploads of `channel_id` and upserts them keyed on video id.
/// Returns the number of rows written.
pub async fn sync_latest_videos(
    youtube: &YouTubeClient,
    store: &dyn RowStore,
    channel_id: &str,
) -> Result<usize, SyncError> {
    info!("Syncing latest videos for channel {channel_id}");

    let rows: Vec<VideoRow> = youtube
        .latest_videos(channel_id, VIDEO_PAGE_SIZE)
        .await?
        .into_iter()
        .map(VideoRow::from)
        .collect();

    upsert_rows(store, &rows).await
}
