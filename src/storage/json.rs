use super::{Storage, StorageError};
use crate::config::Config;
use crate::models::Category;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes an empty collection if the file does not exist yet.
    ///
    /// Returns `true` when the file had to be created.
    pub async fn ensure_exists(&self) -> Result<bool, StorageError> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        self.save(&[]).await?;
        tracing::info!(path = %self.path.display(), "created empty category database");
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn load(&self) -> Result<Vec<Category>, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::Missing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let categories: Vec<Category> = serde_json::from_str(&contents)?;
        tracing::trace!(count = categories.len(), "loaded categories");
        Ok(categories)
    }

    async fn save(&self, categories: &[Category]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(categories)?;

        // Rename over the target so concurrent readers see either the old or new document.
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::trace!(count = categories.len(), "saved categories");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(temp_dir.path().join("db_card.json"));

        let categories = vec![
            Category::new(
                "bc1".to_string(),
                "Animals".to_string(),
                vec![("cat".to_string(), "кіт".to_string())],
            ),
            Category::new("bc2".to_string(), "Empty".to_string(), vec![]),
        ];

        storage.save(&categories).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded, categories);
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(temp_dir.path().join("absent.json"));

        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Missing(_)));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStorage::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_load_pairs_with_extra_members() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("db_card.json");
        std::fs::write(
            &path,
            r#"[{"id":"bc1","title":"A","pairs":[["a","b","c"]]}]"#,
        )
        .unwrap();

        let loaded = JsonStorage::new(&path).load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].pairs, vec![("a".to_string(), "b".to_string())]);
        assert_eq!(loaded[0].summary().length, 1);
    }

    #[tokio::test]
    async fn test_ensure_exists_creates_empty_array() {
        let temp_dir = tempfile::Builder::new()
            .prefix("brain_cards_test_json")
            .tempdir()
            .expect("Failed to create temporary directory");
        let path = temp_dir.path().join("nested").join("db_card.json");
        let storage = JsonStorage::new(&path);

        assert!(storage.ensure_exists().await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_exists_keeps_existing_data() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(temp_dir.path().join("db_card.json"));
        let categories = vec![Category::new("bc1".to_string(), "Kept".to_string(), vec![])];
        storage.save(&categories).await.unwrap();

        assert!(!storage.ensure_exists().await.unwrap());
        assert_eq!(storage.load().await.unwrap(), categories);
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let storage = JsonStorage::new("/data/db_card.json");
        assert_eq!(storage.temp_path(), PathBuf::from("/data/db_card.json.tmp"));
        assert_eq!(storage.path(), Path::new("/data/db_card.json"));
    }
}
