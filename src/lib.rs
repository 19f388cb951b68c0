pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod model;
pub mod output;
pub mod store;
pub mod tracker;
