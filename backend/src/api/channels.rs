use crate::errors::SyncError;
use crate::models::{DiscoveryResponse, ErrorResponse, SubscriberBoundsQuery};
use crate::services::bounds::SubscriberBounds;
use crate::services::channel_service;
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/channels?<bounds..>")]
pub async fn sync_channels(
    bounds: SubscriberBoundsQuery,
    state: &State<AppState>,
) -> Result<Json<DiscoveryResponse>, ErrorResponse> {
    match discover(&bounds, state).await {
        Ok(()) => Ok(Json(DiscoveryResponse {
            status: 200,
            message: "Batch processing completed".to_string(),
        })),
        Err(e) => {
            error!("Channel discovery failed: {e}");
            Err(e.into())
        }
    }
}

async fn discover(query: &SubscriberBoundsQuery, state: &AppState) -> Result<(), SyncError> {
    // Validation happens before anything touches the network.
    let bounds = SubscriberBounds::from_query(
        query.min_subscribers.as_deref(),
        query.max_subscribers.as_deref(),
    )?;
    let youtube = state.youtube()?;
    let store = state.store()?;

    let summary = channel_service::run_channel_discovery(
        youtube,
        store,
        &state.settings.discovery,
        bounds,
    )
    .await?;

    info!(
        "Channel discovery finished: {} channel rows, {} stats rows.",
        summary.channels, summary.stats
    );
    Ok(())
}
