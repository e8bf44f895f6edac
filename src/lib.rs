pub mod cache;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod reconcile;
pub mod remote;
pub mod store;
