use crate::models::{
    generate_id, is_addressable_id, summarize, Category, CategoryError, CategoryPayload,
    CategorySummary,
};
use crate::storage::Storage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Business operations over the category collection.
///
/// Writers hold `write_lock` across load, mutate and save so overlapping
/// requests cannot overwrite each other's changes. Readers go straight to
/// storage.
pub struct CategoryManager {
    storage: Arc<dyn Storage>,
    write_lock: Mutex<()>,
}

impl CategoryManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>, CategoryError> {
        let categories = self.storage.load().await?;
        Ok(summarize(&categories))
    }

    pub async fn get_category(&self, id: &str) -> Result<Category, CategoryError> {
        let categories = self.storage.load().await?;
        categories
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))
    }

    /// Appends a new category and returns its id with the updated summaries.
    pub async fn add_category(
        &self,
        payload: CategoryPayload,
    ) -> Result<(String, Vec<CategorySummary>), CategoryError> {
        let _guard = self.write_lock.lock().await;
        let mut categories = self.storage.load().await?;

        let id = match payload.id.filter(|id| !id.is_empty()) {
            Some(id) => {
                if !is_addressable_id(&id) {
                    return Err(CategoryError::InvalidId(id));
                }
                if categories.iter().any(|c| c.id == id) {
                    return Err(CategoryError::DuplicateId(id));
                }
                id
            }
            None => unused_id(&categories),
        };

        categories.push(Category::new(id.clone(), payload.title, payload.pairs));
        self.storage.save(&categories).await?;

        tracing::info!(%id, "category created");
        Ok((id, summarize(&categories)))
    }

    /// Overwrites the category named by the payload's own `id`.
    ///
    /// `path_id` is only used for logging; the lookup key comes from the body.
    pub async fn update_category(
        &self,
        path_id: &str,
        payload: CategoryPayload,
    ) -> Result<(String, Vec<CategorySummary>), CategoryError> {
        let _guard = self.write_lock.lock().await;
        let mut categories = self.storage.load().await?;

        let Some(id) = payload.id.clone() else {
            return Err(CategoryError::NotFound(path_id.to_string()));
        };
        if id != path_id {
            tracing::debug!(%path_id, body_id = %id, "path and body ids differ, using body id");
        }

        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CategoryError::NotFound(id.clone()))?;
        category.apply(payload);

        self.storage.save(&categories).await?;

        tracing::info!(%id, "category updated");
        Ok((id, summarize(&categories)))
    }

    /// Removes the category if present. Unknown ids are not an error.
    pub async fn delete_category(&self, id: &str) -> Result<Vec<CategorySummary>, CategoryError> {
        let _guard = self.write_lock.lock().await;
        let mut categories = self.storage.load().await?;

        let before = categories.len();
        categories.retain(|c| c.id != id);
        self.storage.save(&categories).await?;

        if categories.len() < before {
            tracing::info!(%id, "category deleted");
        } else {
            tracing::debug!(%id, "delete of unknown category");
        }
        Ok(summarize(&categories))
    }
}

fn unused_id(categories: &[Category]) -> String {
    loop {
        let id = generate_id();
        if !categories.iter().any(|c| c.id == id) {
            return id;
        }
    }
}
