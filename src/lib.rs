//! Core library for playlist-plex-importer
pub mod config;
pub mod models;
pub mod errors;
pub mod progress;
pub mod api;
pub mod extract;
pub mod importer;
