use crate::models::Category;
use crate::storage::{JsonStorage, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A bootstrapped JSON store inside a temporary directory.
pub struct TestStorage {
    temp_dir: TempDir,
    storage: Arc<JsonStorage>,
}

impl TestStorage {
    pub async fn new() -> Self {
        let temp_dir = tempfile::Builder::new()
            .prefix("brain_cards_test")
            .tempdir()
            .expect("Failed to create temporary directory");

        let storage = Arc::new(JsonStorage::new(temp_dir.path().join("db_card.json")));
        storage
            .ensure_exists()
            .await
            .expect("Failed to initialize test storage");

        Self { temp_dir, storage }
    }

    pub async fn with_categories(categories: &[Category]) -> Self {
        let test_storage = Self::new().await;
        test_storage
            .storage
            .save(categories)
            .await
            .expect("Failed to seed test storage");
        test_storage
    }

    pub fn storage(&self) -> &JsonStorage {
        &self.storage
    }

    pub fn shared(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub fn file(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_initialization() {
        let test_storage = TestStorage::new().await;
        let categories = test_storage
            .storage()
            .load()
            .await
            .expect("Failed to load storage");
        assert!(categories.is_empty());
        assert!(test_storage.file().starts_with(test_storage.path()));
    }

    #[tokio::test]
    async fn test_seeded_storage() {
        let seed = vec![Category::new("bc1".to_string(), "Seed".to_string(), vec![])];
        let test_storage = TestStorage::with_categories(&seed).await;

        let categories = test_storage.shared().load().await.unwrap();
        assert_eq!(categories, seed);
    }
}
