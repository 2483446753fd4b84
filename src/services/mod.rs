pub mod api_client;
pub mod cache_store;
pub mod database;
pub mod fetch_service;
pub mod resources;
