pub mod bounds;
pub mod channel_service;
pub mod discovery;
pub mod store;
pub mod video_service;
pub mod youtube_client;
