pub mod config;
pub mod database;
pub mod display_time;
pub mod errors;
pub mod http;
pub mod models;
pub mod policy;
pub mod schema;
pub mod state;
pub mod stores;
pub mod telephony;
