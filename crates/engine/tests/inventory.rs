use engine::{EngineError, ProductDraft, Role};

mod common;

use common::{admin, engine_with_db, staff};

fn draft(name: &str) -> ProductDraft<'_> {
    ProductDraft {
        name: Some(name),
        category: Some("Beverages"),
        subcategory: Some("Tea"),
        supplier: Some("Acme"),
        image_url: Some("https://img.example/tea.png"),
    }
}

#[tokio::test]
async fn add_product_starts_empty_and_is_logged() {
    let (engine, _db) = engine_with_db().await;

    let product = engine.add_product(&staff(), draft("Green tea")).await.unwrap();
    assert_eq!(product.quantity, 0);
    assert_eq!(product.name, "Green tea");

    let products = engine.list_products(&staff()).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, product.id);

    let logs = engine.list_logs(&admin()).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "Added");
    assert_eq!(logs[0].product, "Green tea");
    assert_eq!(logs[0].user, "bob");
}

#[tokio::test]
async fn add_product_requires_every_field() {
    let (engine, _db) = engine_with_db().await;

    let mut incomplete = draft("Green tea");
    incomplete.supplier = Some(" ");
    let err = engine.add_product(&admin(), incomplete).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("Missing required product fields".to_string())
    );

    let err = engine
        .add_product(&admin(), ProductDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert!(engine.list_products(&admin()).await.unwrap().is_empty());
}

#[tokio::test]
async fn products_list_newest_first() {
    let (engine, _db) = engine_with_db().await;

    for name in ["a", "b", "c"] {
        engine.add_product(&admin(), draft(name)).await.unwrap();
    }

    let products = engine.list_products(&admin()).await.unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn update_quantity_sets_stock_and_logs() {
    let (engine, _db) = engine_with_db().await;
    let product = engine.add_product(&admin(), draft("Coffee")).await.unwrap();

    let updated = engine
        .update_product_quantity(&staff(), &product.id, 12)
        .await
        .unwrap();
    assert_eq!(updated.quantity, 12);

    let products = engine.list_products(&admin()).await.unwrap();
    assert_eq!(products[0].quantity, 12);

    let logs = engine.list_logs(&staff()).await.unwrap();
    let update = logs.iter().find(|l| l.action == "Updated").unwrap();
    assert_eq!(update.quantity, 12);
    assert_eq!(update.product, "Coffee");
}

#[tokio::test]
async fn update_quantity_rejects_negative_and_unknown() {
    let (engine, _db) = engine_with_db().await;
    let product = engine.add_product(&admin(), draft("Coffee")).await.unwrap();

    let err = engine
        .update_product_quantity(&admin(), &product.id, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .update_product_quantity(&admin(), "no-such-id", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn delete_product_is_admin_only_and_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let product = engine.add_product(&admin(), draft("Coffee")).await.unwrap();

    let err = engine
        .delete_product(&staff(), &product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_product(&admin(), &product.id).await.unwrap();
    engine.delete_product(&admin(), &product.id).await.unwrap();
    assert!(engine.list_products(&admin()).await.unwrap().is_empty());

    let logs = engine.list_logs(&admin()).await.unwrap();
    let deleted: Vec<_> = logs.iter().filter(|l| l.action == "Deleted").collect();
    assert_eq!(deleted.len(), 2);
    assert!(deleted.iter().any(|l| l.product == "Coffee"));
    assert!(deleted.iter().any(|l| l.product == "Unknown" && l.quantity == 0));
}

#[tokio::test]
async fn suppliers_round_trip() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.add_supplier(&staff(), "  ").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let supplier = engine.add_supplier(&staff(), "Acme").await.unwrap();
    assert_eq!(supplier.created_by, "bob");

    let suppliers = engine.list_suppliers(&admin()).await.unwrap();
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].name, "Acme");

    engine.delete_supplier(&staff(), &supplier.id).await.unwrap();
    engine.delete_supplier(&staff(), &supplier.id).await.unwrap();
    assert!(engine.list_suppliers(&admin()).await.unwrap().is_empty());
}

#[tokio::test]
async fn login_checks_hashed_password() {
    let (engine, _db) = engine_with_db().await;
    let user = engine
        .register_user("carol", "hunter2", Role::Admin)
        .await
        .unwrap();

    let identity = engine.login("carol", "hunter2").await.unwrap();
    assert_eq!(identity.id, user.id);
    assert_eq!(identity.username, "carol");
    assert_eq!(identity.role, Role::Admin);

    assert!(matches!(
        engine.login("carol", "wrong").await,
        Err(EngineError::InvalidCredentials(_))
    ));
    assert!(matches!(
        engine.login("nobody", "hunter2").await,
        Err(EngineError::InvalidCredentials(_))
    ));
}

#[tokio::test]
async fn create_user_defaults_to_staff_and_rejects_duplicates() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .create_user(&admin(), Some("dave"), Some("pw"), None)
        .await
        .unwrap();
    assert_eq!(user.role, Role::Staff);

    let err = engine
        .create_user(&admin(), Some("dave"), Some("other"), Some("admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .create_user(&admin(), Some("erin"), Some("pw"), Some("owner"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_user(&admin(), Some("erin"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine
            .create_user(&staff(), Some("frank"), Some("pw"), None)
            .await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.list_users(&staff()).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.delete_user(&staff(), "x").await,
        Err(EngineError::Forbidden(_))
    ));

    let user = engine
        .create_user(&admin(), Some("frank"), Some("pw"), Some("admin"))
        .await
        .unwrap();
    let users = engine.list_users(&admin()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::Admin);

    engine.delete_user(&admin(), &user.id).await.unwrap();
    engine.delete_user(&admin(), &user.id).await.unwrap();
    assert!(engine.list_users(&admin()).await.unwrap().is_empty());
}
