use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic acknowledgement body returned by mutating endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Role carried by every identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginUser {
        pub username: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub message: String,
        pub user: LoginUser,
        pub token: String,
    }
}

pub mod category {
    use super::*;
    use serde_json::Value;

    /// Whether a record is a top-level category or one of its children.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Category,
        Subcategory,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryCreate {
        #[serde(default)]
        pub name: Option<String>,
        /// Inline children, as `[{"name": "..."}, ...]`. Kept loosely typed:
        /// entries that are not objects with a string `name`, or a value that
        /// is not an array, are ignored rather than failing the request.
        #[serde(default)]
        pub subcategories: Option<Value>,
        #[serde(default)]
        pub parent_id: Option<String>,
    }

    impl CategoryCreate {
        /// Names of the inline children that carry a string `name`.
        pub fn subcategory_names(&self) -> Vec<String> {
            let Some(Value::Array(entries)) = &self.subcategories else {
                return Vec::new();
            };
            entries
                .iter()
                .filter_map(|entry| entry.get("name").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub message: String,
        pub id: String,
    }

    /// Query string of `DELETE /categories/{id}`.
    ///
    /// `type=category` removes the category together with its subcategories;
    /// anything else removes the single record.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryDelete {
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub parent_id: Option<String>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    /// A top-level category with its children attached.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTreeView {
        #[serde(flatten)]
        pub category: CategoryView,
        pub subcategories: Vec<CategoryView>,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNew {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub subcategory: Option<String>,
        #[serde(default)]
        pub supplier: Option<String>,
        #[serde(default)]
        pub image_url: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuantityUpdate {
        pub quantity: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductView {
        pub id: String,
        pub name: String,
        pub category: String,
        pub subcategory: String,
        pub supplier: String,
        pub quantity: i64,
        pub image_url: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductCreated {
        pub message: String,
        pub product: ProductView,
    }
}

pub mod supplier {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SupplierNew {
        #[serde(default)]
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SupplierView {
        pub id: String,
        pub name: String,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierCreated {
        pub message: String,
        pub supplier: SupplierView,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserNew {
        #[serde(default)]
        pub username: Option<String>,
        #[serde(default)]
        pub password: Option<String>,
        /// Defaults to `staff` when absent.
        #[serde(default)]
        pub role: Option<String>,
    }

    /// A user as exposed over HTTP. Password material never leaves the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub username: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub message: String,
        pub user: UserView,
    }
}

pub mod log {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogView {
        pub id: String,
        pub action: String,
        pub product: String,
        pub quantity: i64,
        pub user: String,
        pub date: DateTime<Utc>,
    }
}
