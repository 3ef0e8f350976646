//! Library crate for url-guard exposing reusable modules.
pub mod config;
pub mod error;
pub mod form;
pub mod panels;
pub mod server;
pub mod threat;
pub mod types;
