pub mod api;
pub mod automation;
pub mod config;
pub mod error;
pub mod models;
pub mod platform;
