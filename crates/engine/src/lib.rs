//! Inventory engine: entities, the category store adapter, the hierarchy
//! builder and every operation exposed over HTTP.

pub use categories::{Category, CategoryKind, CategoryNode};
pub use error::EngineError;
pub use identity::{Identity, Role};
pub use logs::{LogAction, LogEntry};
pub use ops::{CategoryDeletion, Engine, EngineBuilder, ProductDraft};
pub use products::Product;
pub use store::{CategoryStore, MAX_BATCH_ITEMS};
pub use suppliers::Supplier;
pub use users::User;

pub mod hierarchy;

mod categories;
mod error;
mod identity;
mod logs;
mod ops;
mod password;
mod products;
mod store;
mod suppliers;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
