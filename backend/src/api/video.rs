use crate::errors::SyncError;
use crate::models::{ErrorResponse, VideoSyncResponse};
use crate::services::video_service;
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/videos")]
pub async fn sync_videos(
    state: &State<AppState>,
) -> Result<Json<VideoSyncResponse>, ErrorResponse> {
    match sync(state).await {
        Ok(inserted) => {
            info!("Video sync finished, {inserted} rows upserted.");
            Ok(Json(VideoSyncResponse { inserted }))
        }
        Err(e) => {
            error!("Video sync failed: {e}");
            Err(ErrorResponse::server_error("batch failed"))
        }
    }
}

async fn sync(state: &AppState) -> Result<usize, SyncError> {
    let youtube = state.youtube()?;
    let store = state.store()?;
    video_service::sync_latest_videos(youtube, store, &state.settings.video_channel_id).await
}
