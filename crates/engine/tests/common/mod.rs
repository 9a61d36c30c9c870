#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, Identity, Role};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn admin() -> Identity {
    Identity::new("admin-id", "alice", Role::Admin)
}

pub fn staff() -> Identity {
    Identity::new("staff-id", "bob", Role::Staff)
}
