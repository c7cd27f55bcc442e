#[macro_use]
extern crate rocket;

mod api;
mod config;
mod errors;
mod models;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use crate::errors::SyncError;
use crate::services::discovery::DiscoveryQuery;
use crate::services::store::RowStore;
use crate::services::youtube_client::YouTubeClient;
use log::error;
use rocket::{Build, Rocket};
use std::sync::Arc;

/// Fixed inputs of the two sync jobs.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub video_channel_id: String,
    pub discovery: DiscoveryQuery,
}

pub struct AppState {
    pub youtube: Option<YouTubeClient>,
    pub store: Option<Arc<dyn RowStore>>,
    pub settings: SyncSettings,
}

impl AppState {
    pub fn youtube(&self) -> Result<&YouTubeClient, SyncError> {
        self.youtube
            .as_ref()
            .ok_or_else(|| SyncError::Configuration("Missing YOUTUBE_API_KEY".to_string()))
    }

    pub fn store(&self) -> Result<&dyn RowStore, SyncError> {
        self.store.as_deref().ok_or_else(|| {
            SyncError::Configuration("Missing store configuration (ELASTICSEARCH_URL)".to_string())
        })
    }
}

#[get("/")]
fn index() -> &'static str {
    "youtube-sync ok"
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![index])
        .mount("/api/sync", routes![api::sync_videos, api::sync_channels])
}

#[launch]
async fn rocket() -> _ {
    config::load_environment();
    config::init_logger();

    let state = config::create_app_state().await;
    let rocket = build_rocket(state);

    match config::create_cors() {
        Ok(cors) => rocket.attach(cors),
        Err(e) => {
            error!("{e}");
            rocket
        }
    }
}
