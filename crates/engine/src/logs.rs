//! Audit log of product mutations.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

/// Kind of product mutation recorded in the audit log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogAction {
    Added,
    Updated,
    Deleted,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub action: String,
    pub product: String,
    pub quantity: i64,
    pub user: String,
    pub date: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(action: LogAction, product: &str, quantity: i64, user: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action: action.as_str().to_string(),
            product: product.to_string(),
            quantity,
            user: user.to_string(),
            date: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub action: String,
    pub product: String,
    pub quantity: i64,
    pub user: String,
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LogEntry> for ActiveModel {
    fn from(value: &LogEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            action: ActiveValue::Set(value.action.clone()),
            product: ActiveValue::Set(value.product.clone()),
            quantity: ActiveValue::Set(value.quantity),
            user: ActiveValue::Set(value.user.clone()),
            date: ActiveValue::Set(value.date),
        }
    }
}

impl From<Model> for LogEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            action: model.action,
            product: model.product,
            quantity: model.quantity,
            user: model.user,
            date: model.date,
        }
    }
}
