pub mod client;
pub mod config;
pub mod connection;
pub mod engine;
pub mod metrics;
pub mod models;
pub mod reconciler;
pub mod store;
pub mod ui;
