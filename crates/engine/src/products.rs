//! Products tracked in the inventory.
//!
//! `category`, `subcategory` and `supplier` hold the display names chosen by
//! the client; they are not foreign keys.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub supplier: String,
    pub quantity: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// New products always start with an empty stock.
    pub fn new(
        name: String,
        category: String,
        subcategory: String,
        supplier: String,
        image_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            category,
            subcategory,
            supplier,
            quantity: 0,
            image_url,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub supplier: String,
    pub quantity: i64,
    pub image_url: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            category: ActiveValue::Set(value.category.clone()),
            subcategory: ActiveValue::Set(value.subcategory.clone()),
            supplier: ActiveValue::Set(value.supplier.clone()),
            quantity: ActiveValue::Set(value.quantity),
            image_url: ActiveValue::Set(value.image_url.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            subcategory: model.subcategory,
            supplier: model.supplier,
            quantity: model.quantity,
            image_url: model.image_url,
            created_at: model.created_at,
        }
    }
}
