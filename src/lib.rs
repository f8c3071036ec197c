//! Flashcard category service.
//!
//! Categories live in a single JSON document on disk. Each request loads the
//! whole collection, works on it in memory and, for writes, saves the whole
//! collection back.
//!
//! - [`storage`]: whole-file JSON persistence behind the [`storage::Storage`] trait
//! - [`models`]: records, summaries and payload validation
//! - [`category_manager`]: create, replace, delete, list and fetch
//! - [`server`]: axum routes, CORS headers and error responses

pub mod category_manager;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod storage;
