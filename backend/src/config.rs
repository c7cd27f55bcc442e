use crate::services::discovery::DiscoveryQuery;
use crate::services::store::{ElasticsearchStore, RowStore};
use crate::services::youtube_client::{YouTubeClient, DEFAULT_API_BASE_URL};
use crate::{AppState, SyncSettings};
use anyhow::Result;
use elasticsearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch,
};
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{error, info, warn, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

lazy_static! {
    pub static ref YOUTUBE_API_KEY: Option<String> = optional_var("YOUTUBE_API_KEY");
    pub static ref YOUTUBE_API_BASE_URL: String =
        optional_var("YOUTUBE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    pub static ref ELASTICSEARCH_URL: Option<String> = optional_var("ELASTICSEARCH_URL");
    pub static ref ELASTICSEARCH_API_KEY: Option<String> = optional_var("ELASTICSEARCH_API_KEY");
    pub static ref VIDEO_SYNC_CHANNEL_ID: String = optional_var("VIDEO_SYNC_CHANNEL_ID")
        .unwrap_or_else(|| "UC_x5XG1OV2P6uZZ5FSM9Ttw".to_string());
    pub static ref DISCOVERY_KEYWORD: String =
        optional_var("DISCOVERY_KEYWORD").unwrap_or_else(|| "tech review".to_string());
    pub static ref DISCOVERY_REGION: String =
        optional_var("DISCOVERY_REGION").unwrap_or_else(|| "US".to_string());
    pub static ref DISCOVERY_LANGUAGE: String =
        optional_var("DISCOVERY_LANGUAGE").unwrap_or_else(|| "en".to_string());
    pub static ref CORS_ALLOWED_ORIGIN: String = optional_var("CORS_ALLOWED_ORIGIN")
        .unwrap_or_else(|| "http://localhost:8080".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting youtube-sync backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_elasticsearch_client(es_url: &str, api_key: Option<&str>) -> Result<Elasticsearch> {
    info!("Connecting to Elasticsearch at: {es_url}");

    let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(es_url.parse()?));
    if let Some(key) = api_key {
        builder = builder.auth(Credentials::EncodedApiKey(key.to_string()));
    }

    Ok(Elasticsearch::new(builder.build()?))
}

pub fn create_youtube_client() -> Option<YouTubeClient> {
    let Some(api_key) = YOUTUBE_API_KEY.as_deref() else {
        warn!("YOUTUBE_API_KEY is not set; sync endpoints will report a configuration error.");
        return None;
    };

    match YouTubeClient::new(api_key, &YOUTUBE_API_BASE_URL) {
        Ok(client) => Some(client),
        Err(e) => {
            error!("Invalid YOUTUBE_API_BASE_URL: {e}");
            None
        }
    }
}

pub async fn create_row_store() -> Option<Arc<dyn RowStore>> {
    let Some(es_url) = ELASTICSEARCH_URL.as_deref() else {
        warn!("ELASTICSEARCH_URL is not set; sync endpoints will report a configuration error.");
        return None;
    };

    match create_elasticsearch_client(es_url, ELASTICSEARCH_API_KEY.as_deref()) {
        Ok(client) => {
            let store = ElasticsearchStore::new(client);
            store.create_indices().await;
            Some(Arc::new(store))
        }
        Err(e) => {
            error!("Failed to create Elasticsearch client: {e}");
            None
        }
    }
}

pub fn sync_settings() -> SyncSettings {
    SyncSettings {
        video_channel_id: VIDEO_SYNC_CHANNEL_ID.clone(),
        discovery: DiscoveryQuery {
            keyword: DISCOVERY_KEYWORD.clone(),
            region: DISCOVERY_REGION.clone(),
            language: DISCOVERY_LANGUAGE.clone(),
        },
    }
}

pub async fn create_app_state() -> AppState {
    AppState {
        youtube: create_youtube_client(),
        store: create_row_store().await,
        settings: sync_settings(),
    }
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[CORS_ALLOWED_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
