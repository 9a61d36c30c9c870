use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, prelude::*};

use crate::{
    EngineError, Identity, ResultEngine,
    logs::LogAction,
    products::{self, Product},
};

use super::{Engine, normalize_optional_text};

/// Fields required to create a product. Every field must be non-blank.
#[derive(Debug, Default)]
pub struct ProductDraft<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub supplier: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

impl Engine {
    pub async fn add_product(
        &self,
        identity: &Identity,
        draft: ProductDraft<'_>,
    ) -> ResultEngine<Product> {
        let missing = || EngineError::InvalidInput("Missing required product fields".to_string());
        let name = normalize_optional_text(draft.name).ok_or_else(missing)?;
        let category = normalize_optional_text(draft.category).ok_or_else(missing)?;
        let subcategory = normalize_optional_text(draft.subcategory).ok_or_else(missing)?;
        let supplier = normalize_optional_text(draft.supplier).ok_or_else(missing)?;
        let image_url = normalize_optional_text(draft.image_url).ok_or_else(missing)?;

        let product = Product::new(name, category, subcategory, supplier, image_url, Utc::now());
        products::Entity::insert(products::ActiveModel::from(&product))
            .exec(&self.database)
            .await?;
        tracing::info!("{} added product {}", identity.username, product.id);

        self.record_action(LogAction::Added, &product.name, 0, &identity.username)
            .await;
        Ok(product)
    }

    /// Lists products, most recently created first.
    pub async fn list_products(&self, identity: &Identity) -> ResultEngine<Vec<Product>> {
        tracing::debug!("{} listed products", identity.username);
        let rows = products::Entity::find()
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Sets the stock of a product to `quantity`.
    pub async fn update_product_quantity(
        &self,
        identity: &Identity,
        id: &str,
        quantity: i64,
    ) -> ResultEngine<Product> {
        if quantity < 0 {
            return Err(EngineError::InvalidInput(
                "Invalid quantity value".to_string(),
            ));
        }
        let model = products::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Product not found".to_string()))?;

        let mut active: products::ActiveModel = model.into();
        active.quantity = ActiveValue::Set(quantity);
        let product = Product::from(active.update(&self.database).await?);
        tracing::info!(
            "{} set quantity of product {id} to {quantity}",
            identity.username
        );

        self.record_action(LogAction::Updated, &product.name, quantity, &identity.username)
            .await;
        Ok(product)
    }

    /// Deletes a product. Deleting a missing id is not an error; the audit
    /// entry then names an `Unknown` product.
    pub async fn delete_product(&self, identity: &Identity, id: &str) -> ResultEngine<()> {
        identity.require_admin("delete products")?;
        let existing = products::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?;
        let (name, quantity) = existing
            .map(|p| (p.name, p.quantity))
            .unwrap_or_else(|| ("Unknown".to_string(), 0));

        products::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        tracing::info!("{} deleted product {id}", identity.username);

        self.record_action(LogAction::Deleted, &name, quantity, &identity.username)
            .await;
        Ok(())
    }
}
