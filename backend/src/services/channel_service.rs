use crate::errors::SyncError;
use crate::models::{ChannelRow, ChannelStatsRow};
use crate::services::bounds::SubscriberBounds;
use crate::services::discovery::{
    discover_channels, ChannelSource, DiscoveryQuery, CHUNK_SIZE, MAX_RESULTS,
};
use crate::services::store::{upsert_rows, RowStore};
use crate::utils::now_rfc3339;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub channels: usize,
    pub stats: usize,
}

/// Runs one channel discovery pass and persists identity rows, then stats rows.
///
/// The bounds are validated by the caller and recorded here, but they do not
/// filter what gets written.
pub async fn run_channel_discovery<S>(
    source: &S,
    store: &dyn RowStore,
    query: &DiscoveryQuery,
    bounds: SubscriberBounds,
) -> Result<DiscoverySummary, SyncError>
where
    S: ChannelSource + ?Sized,
{
    info!(
        "Channel discovery for '{}' ({}/{}), subscriber bounds {}..={}",
        query.keyword, query.region, query.language, bounds.min, bounds.max
    );

    let channels = discover_channels(source, query, MAX_RESULTS, CHUNK_SIZE).await?;

    let captured_at = now_rfc3339();
    let channel_rows: Vec<ChannelRow> = channels.iter().map(ChannelRow::from).collect();
    let stats_rows: Vec<ChannelStatsRow> = channels
        .iter()
        .map(|channel| ChannelStatsRow::from_candidate(channel, &captured_at))
        .collect();

    // A stats failure leaves the channel rows in place; there is no rollback.
    let channels_written = upsert_rows(store, &channel_rows).await?;
    let stats_written = upsert_rows(store, &stats_rows).await?;

    Ok(DiscoverySummary {
        channels: channels_written,
        stats: stats_written,
    })
}
