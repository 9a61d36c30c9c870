//! Key-value access to the `categories` table.
//!
//! The table is treated as a document collection keyed by `id`: point reads,
//! full scans, puts and batched writes/deletes. A batch request carries at most
//! [`MAX_BATCH_ITEMS`] items and is committed on its own; callers that need more
//! split their work and accept that earlier batches stay committed when a later
//! one fails.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};

use crate::{
    EngineError, ResultEngine,
    categories::{self, Category},
};

/// Largest number of items a single batch request may carry.
pub const MAX_BATCH_ITEMS: usize = 25;

pub struct CategoryStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CategoryStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: &str) -> ResultEngine<Option<Category>> {
        categories::Entity::find_by_id(id.to_string())
            .one(self.db)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    /// Reads the whole collection in store order.
    ///
    /// Rows with an unknown `kind` cannot take part in the hierarchy and are
    /// skipped.
    pub async fn scan(&self) -> ResultEngine<Vec<Category>> {
        let rows = categories::Entity::find().all(self.db).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match Category::try_from(row) {
                Ok(item) => items.push(item),
                Err(err) => tracing::warn!("skipping category {id}: {err}"),
            }
        }
        Ok(items)
    }

    pub async fn put(&self, item: &Category) -> ResultEngine<()> {
        categories::Entity::insert(categories::ActiveModel::from(item))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Writes up to [`MAX_BATCH_ITEMS`] records in one request.
    pub async fn batch_write(&self, items: &[Category]) -> ResultEngine<()> {
        check_batch_size(items.len())?;
        if items.is_empty() {
            return Ok(());
        }
        categories::Entity::insert_many(items.iter().map(categories::ActiveModel::from))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Deletes up to [`MAX_BATCH_ITEMS`] records by id in one request.
    ///
    /// Ids that are already gone are ignored. Returns how many rows were
    /// actually removed.
    pub async fn batch_delete(&self, ids: &[String]) -> ResultEngine<u64> {
        check_batch_size(ids.len())?;
        if ids.is_empty() {
            return Ok(0);
        }
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Id.is_in(ids.iter().cloned()))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes one record by id. Deleting a missing id is not an error.
    pub async fn delete(&self, id: &str) -> ResultEngine<()> {
        categories::Entity::delete_by_id(id.to_string())
            .exec(self.db)
            .await?;
        Ok(())
    }
}

fn check_batch_size(len: usize) -> ResultEngine<()> {
    if len > MAX_BATCH_ITEMS {
        return Err(EngineError::InvalidInput(format!(
            "batch of {len} items exceeds the limit of {MAX_BATCH_ITEMS}"
        )));
    }
    Ok(())
}
