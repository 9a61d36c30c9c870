use chrono::Utc;

use crate::{
    EngineError, Identity, ResultEngine,
    categories::{Category, CategoryKind, CategoryNode},
    hierarchy,
    store::{CategoryStore, MAX_BATCH_ITEMS},
};

use super::{Engine, normalize_optional_text, normalize_required_name};

/// What a successful [`Engine::delete_category`] removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryDeletion {
    /// The category and its subcategories; `removed` counts the selected records.
    Cascade { removed: usize },
    /// A single record, which may not have existed.
    Single,
}

/// Ids selected for a cascade delete, consumed one store batch at a time.
///
/// Every step deletes by id, so replaying a step that already committed is
/// harmless; after a failure the cursor still points at the first batch that
/// was not confirmed.
#[derive(Debug)]
struct CascadeCursor {
    ids: Vec<String>,
    done: usize,
}

impl CascadeCursor {
    fn new(ids: Vec<String>) -> Self {
        Self { ids, done: 0 }
    }

    fn next_batch(&self) -> Option<&[String]> {
        if self.done >= self.ids.len() {
            return None;
        }
        let end = (self.done + MAX_BATCH_ITEMS).min(self.ids.len());
        Some(&self.ids[self.done..end])
    }

    fn advance(&mut self) {
        self.done = (self.done + MAX_BATCH_ITEMS).min(self.ids.len());
    }

    fn done(&self) -> usize {
        self.done
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

impl Engine {
    /// Creates a category, or a subcategory when `parent_id` names a category.
    ///
    /// Inline `subcategories` with a blank name are skipped; a subcategory
    /// cannot carry any of its own. All records share one creation timestamp
    /// and are written in store batches; a failure after the first batch leaves
    /// the earlier ones in place.
    ///
    /// A blank `name` is rejected for every caller, before the role check.
    pub async fn add_category(
        &self,
        identity: &Identity,
        name: &str,
        subcategories: &[String],
        parent_id: Option<&str>,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "category")?;
        identity.require_admin("add categories")?;
        let store = CategoryStore::new(&self.database);

        let subcategories: Vec<String> = subcategories
            .iter()
            .filter_map(|sub| normalize_optional_text(Some(sub)))
            .collect();
        let parent_id = normalize_optional_text(parent_id);
        if let Some(parent_id) = parent_id.as_deref() {
            if !subcategories.is_empty() {
                return Err(EngineError::InvalidInput(
                    "A subcategory cannot have subcategories".to_string(),
                ));
            }
            let parent = store
                .get(parent_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("Parent category not found".to_string()))?;
            if parent.kind != CategoryKind::Category {
                return Err(EngineError::InvalidInput(
                    "Cannot add subcategory under another subcategory".to_string(),
                ));
            }
        }

        let created_at = Utc::now();
        let created_by = identity.username.clone();
        let main = match parent_id.as_deref() {
            Some(parent_id) => Category::child_of(parent_id, name, created_by.clone(), created_at),
            None => Category::new(name, created_by.clone(), created_at),
        };
        let main_id = main.id.clone();

        let mut items = vec![main];
        items.extend(
            subcategories
                .into_iter()
                .map(|sub| Category::child_of(&main_id, sub, created_by.clone(), created_at)),
        );

        if let [item] = items.as_slice() {
            store.put(item).await?;
        } else {
            for chunk in items.chunks(MAX_BATCH_ITEMS) {
                store.batch_write(chunk).await?;
            }
        }

        tracing::info!(
            "{} added category {main_id} with {} subcategories",
            identity.username,
            items.len() - 1
        );
        Ok(main_id)
    }

    /// Lists every category with its subcategories, newest category first.
    pub async fn list_categories(&self, identity: &Identity) -> ResultEngine<Vec<CategoryNode>> {
        let records = CategoryStore::new(&self.database).scan().await?;
        tracing::debug!(
            "{} listed {} category records",
            identity.username,
            records.len()
        );
        Ok(hierarchy::build(records))
    }

    /// Deletes a category record.
    ///
    /// With `kind == Some("category")` the category and every record whose
    /// `parent_id` is `id` are removed, in sequential store batches. Any other
    /// `kind` removes exactly the record `id`, and succeeds even if it does not
    /// exist.
    pub async fn delete_category(
        &self,
        identity: &Identity,
        id: &str,
        kind: Option<&str>,
    ) -> ResultEngine<CategoryDeletion> {
        identity.require_admin("delete categories")?;
        let id = id.trim();
        if id.is_empty() {
            return Err(EngineError::InvalidInput("Missing ID".to_string()));
        }
        let store = CategoryStore::new(&self.database);

        if kind != Some(CategoryKind::Category.as_str()) {
            store.delete(id).await?;
            tracing::info!("{} deleted category record {id}", identity.username);
            return Ok(CategoryDeletion::Single);
        }

        let selected: Vec<String> = store
            .scan()
            .await?
            .into_iter()
            .filter(|item| item.id == id || item.parent_id.as_deref() == Some(id))
            .map(|item| item.id)
            .collect();
        if selected.is_empty() {
            return Err(EngineError::KeyNotFound(
                "Category or its subcategories not found".to_string(),
            ));
        }

        let mut cursor = CascadeCursor::new(selected);
        while let Some(batch) = cursor.next_batch() {
            if let Err(err) = store.batch_delete(batch).await {
                tracing::error!(
                    "cascade delete of {id} stopped after {}/{} records: {err}",
                    cursor.done(),
                    cursor.len()
                );
                return Err(err);
            }
            cursor.advance();
        }

        tracing::info!(
            "{} deleted category {id} and {} subcategories",
            identity.username,
            cursor.len() - 1
        );
        Ok(CategoryDeletion::Cascade {
            removed: cursor.len(),
        })
    }
}
