//! Category records.
//!
//! Categories and subcategories share one table. A subcategory points at its
//! owning category through `parent_id`; top-level categories have none.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Level of a record in the two-level category tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryKind {
    Category,
    Subcategory,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "category" => Ok(Self::Category),
            "subcategory" => Ok(Self::Subcategory),
            other => Err(EngineError::InvalidInput(format!(
                "invalid category type: {other}"
            ))),
        }
    }
}

/// A category or subcategory as read from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
    pub parent_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Builds a new top-level category with a fresh id.
    pub fn new(name: String, created_by: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            kind: CategoryKind::Category,
            parent_id: None,
            created_by,
            created_at,
        }
    }

    /// Builds a new subcategory owned by `parent_id`.
    pub fn child_of(
        parent_id: &str,
        name: String,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            kind: CategoryKind::Subcategory,
            parent_id: Some(parent_id.to_string()),
            created_by,
            created_at,
        }
    }

    pub fn is_category(&self) -> bool {
        self.kind == CategoryKind::Category
    }

    pub fn is_subcategory(&self) -> bool {
        self.kind == CategoryKind::Subcategory
    }
}

/// A top-level category with its subcategories attached.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub subcategories: Vec<Category>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            parent_id: ActiveValue::Set(value.parent_id.clone()),
            created_by: ActiveValue::Set(value.created_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            kind: CategoryKind::try_from(model.kind.as_str())?,
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
