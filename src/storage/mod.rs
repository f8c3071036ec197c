use crate::models::Category;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub mod json;
#[cfg(test)]
pub(crate) mod test_utils;

pub use json::JsonStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Whole-collection persistence. Every call reads or writes the full list.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn load(&self) -> Result<Vec<Category>, StorageError>;
    async fn save(&self, categories: &[Category]) -> Result<(), StorageError>;
}
