use chrono::Utc;
use sea_orm::ConnectionTrait;

use engine::{Category, CategoryDeletion, CategoryKind, CategoryNode, CategoryStore, EngineError};

mod common;

use common::{admin, engine_with_db, staff};

fn names(items: &[engine::Category]) -> Vec<String> {
    let mut names: Vec<String> = items.iter().map(|c| c.name.clone()).collect();
    names.sort();
    names
}

fn find<'a>(tree: &'a [CategoryNode], name: &str) -> Option<&'a CategoryNode> {
    tree.iter().find(|node| node.category.name == name)
}

#[tokio::test]
async fn add_with_inline_subcategories_lists_one_tree() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .add_category(
            &admin(),
            "Beverages",
            &["Tea".to_string(), "Coffee".to_string()],
            None,
        )
        .await
        .unwrap();

    let tree = engine.list_categories(&staff()).await.unwrap();
    assert_eq!(tree.len(), 1);
    let node = &tree[0];
    assert_eq!(node.category.id, id);
    assert_eq!(node.category.name, "Beverages");
    assert_eq!(node.category.kind, CategoryKind::Category);
    assert_eq!(node.category.parent_id, None);
    assert_eq!(node.category.created_by, "alice");
    assert_eq!(names(&node.subcategories), ["Coffee", "Tea"]);
    for sub in &node.subcategories {
        assert_eq!(sub.kind, CategoryKind::Subcategory);
        assert_eq!(sub.parent_id.as_deref(), Some(id.as_str()));
        assert_eq!(sub.created_at, node.category.created_at);
    }
}

#[tokio::test]
async fn blank_inline_subcategories_are_skipped() {
    let (engine, _db) = engine_with_db().await;

    engine
        .add_category(
            &admin(),
            "Dairy",
            &["Milk".to_string(), "".to_string(), "  ".to_string()],
            None,
        )
        .await
        .unwrap();

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(names(&tree[0].subcategories), ["Milk"]);
}

#[tokio::test]
async fn add_with_parent_creates_subcategory() {
    let (engine, _db) = engine_with_db().await;

    let snacks = engine
        .add_category(&admin(), "Snacks", &[], None)
        .await
        .unwrap();
    let chips = engine
        .add_category(&admin(), "Chips", &[], Some(snacks.as_str()))
        .await
        .unwrap();

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(tree.len(), 1);
    let node = find(&tree, "Snacks").unwrap();
    assert_eq!(node.subcategories.len(), 1);
    assert_eq!(node.subcategories[0].id, chips);
    assert_eq!(node.subcategories[0].name, "Chips");
    assert_eq!(node.subcategories[0].kind, CategoryKind::Subcategory);
}

#[tokio::test]
async fn cannot_nest_under_subcategory() {
    let (engine, _db) = engine_with_db().await;

    let snacks = engine
        .add_category(&admin(), "Snacks", &[], None)
        .await
        .unwrap();
    let chips = engine
        .add_category(&admin(), "Chips", &[], Some(snacks.as_str()))
        .await
        .unwrap();

    let err = engine
        .add_category(&admin(), "Salted", &[], Some(chips.as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(names(&tree[0].subcategories), ["Chips"]);
}

#[tokio::test]
async fn missing_parent_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_category(&admin(), "Chips", &[], Some("no-such-id"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn empty_name_is_invalid_input() {
    let (engine, _db) = engine_with_db().await;

    for name in ["", "   "] {
        let err = engine
            .add_category(&admin(), name, &["Tea".to_string()], None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
    assert!(engine.list_categories(&admin()).await.unwrap().is_empty());
}

#[tokio::test]
async fn staff_cannot_add_or_delete() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_category(&staff(), "Snacks", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let id = engine
        .add_category(&admin(), "Snacks", &[], None)
        .await
        .unwrap();
    let err = engine
        .delete_category(&staff(), &id, Some("category"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(engine.list_categories(&staff()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn new_ids_never_collide() {
    let (engine, _db) = engine_with_db().await;

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        ids.push(
            engine
                .add_category(&admin(), name, &["x".to_string(), "y".to_string()], None)
                .await
                .unwrap(),
        );
    }

    let tree = engine.list_categories(&admin()).await.unwrap();
    let mut all: Vec<String> = tree
        .iter()
        .flat_map(|n| {
            std::iter::once(n.category.id.clone())
                .chain(n.subcategories.iter().map(|s| s.id.clone()))
        })
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(total, 9);
    assert_eq!(all.len(), total);
    assert!(ids.iter().all(|id| all.contains(id)));
}

#[tokio::test]
async fn list_is_newest_first() {
    let (engine, _db) = engine_with_db().await;

    for name in ["First", "Second", "Third"] {
        engine
            .add_category(&admin(), name, &[], None)
            .await
            .unwrap();
    }

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(tree.len(), 3);
    assert!(
        tree.windows(2)
            .all(|w| w[0].category.created_at >= w[1].category.created_at)
    );
}

#[tokio::test]
async fn orphan_subcategories_are_not_listed() {
    let (engine, db) = engine_with_db().await;

    engine
        .add_category(&admin(), "Snacks", &["Chips".to_string()], None)
        .await
        .unwrap();
    let orphan = Category::child_of("gone", "Lost".to_string(), "alice".to_string(), Utc::now());
    CategoryStore::new(&db).put(&orphan).await.unwrap();

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(names(&tree[0].subcategories), ["Chips"]);
}

#[tokio::test]
async fn cascade_delete_removes_category_and_children() {
    let (engine, db) = engine_with_db().await;

    let snacks = engine
        .add_category(&admin(), "Snacks", &[], None)
        .await
        .unwrap();
    engine
        .add_category(&admin(), "Chips", &[], Some(snacks.as_str()))
        .await
        .unwrap();
    engine
        .add_category(&admin(), "Drinks", &["Tea".to_string()], None)
        .await
        .unwrap();

    let outcome = engine
        .delete_category(&admin(), &snacks, Some("category"))
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Cascade { removed: 2 });

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert!(find(&tree, "Snacks").is_none());
    assert_eq!(tree.len(), 1);
    assert_eq!(names(&tree[0].subcategories), ["Tea"]);

    let remaining = CategoryStore::new(&db).scan().await.unwrap();
    assert!(
        remaining
            .iter()
            .all(|c| c.id != snacks && c.parent_id.as_deref() != Some(snacks.as_str()))
    );
}

#[tokio::test]
async fn cascade_delete_of_missing_category_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .delete_category(&admin(), "no-such-id", Some("category"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn cascade_delete_spans_several_batches() {
    let (engine, db) = engine_with_db().await;

    let subs: Vec<String> = (0..60).map(|i| format!("Sub {i}")).collect();
    let id = engine
        .add_category(&admin(), "Big", &subs, None)
        .await
        .unwrap();
    assert_eq!(CategoryStore::new(&db).scan().await.unwrap().len(), 61);

    let outcome = engine
        .delete_category(&admin(), &id, Some("category"))
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Cascade { removed: 61 });
    assert!(CategoryStore::new(&db).scan().await.unwrap().is_empty());

    let err = engine
        .delete_category(&admin(), &id, Some("category"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn cascade_delete_finishes_after_parent_is_already_gone() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .add_category(&admin(), "Snacks", &["Chips".to_string(), "Nuts".to_string()], None)
        .await
        .unwrap();
    engine.delete_category(&admin(), &id, None).await.unwrap();

    let outcome = engine
        .delete_category(&admin(), &id, Some("category"))
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Cascade { removed: 2 });
}

#[tokio::test]
async fn single_delete_removes_only_that_subcategory() {
    let (engine, _db) = engine_with_db().await;

    engine
        .add_category(&admin(), "Beverages", &["Tea".to_string(), "Coffee".to_string()], None)
        .await
        .unwrap();
    let tree = engine.list_categories(&admin()).await.unwrap();
    let tea = tree[0]
        .subcategories
        .iter()
        .find(|s| s.name == "Tea")
        .unwrap()
        .id
        .clone();

    let outcome = engine
        .delete_category(&admin(), &tea, Some("subcategory"))
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Single);

    let tree = engine.list_categories(&admin()).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].category.name, "Beverages");
    assert_eq!(names(&tree[0].subcategories), ["Coffee"]);
}

#[tokio::test]
async fn single_delete_of_missing_id_succeeds() {
    let (engine, _db) = engine_with_db().await;

    let outcome = engine
        .delete_category(&admin(), "no-such-id", None)
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Single);
}

#[tokio::test]
async fn single_delete_of_category_keeps_its_children_stored() {
    let (engine, db) = engine_with_db().await;

    let id = engine
        .add_category(&admin(), "Snacks", &["Chips".to_string()], None)
        .await
        .unwrap();
    engine.delete_category(&admin(), &id, None).await.unwrap();

    assert!(engine.list_categories(&admin()).await.unwrap().is_empty());
    let stored = CategoryStore::new(&db).scan().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Chips");
}

#[tokio::test]
async fn empty_name_is_invalid_for_every_role() {
    let (engine, _db) = engine_with_db().await;

    for identity in [admin(), staff()] {
        let err = engine
            .add_category(&identity, " ", &[], None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInput("Invalid category name".to_string())
        );
    }
}

#[tokio::test]
async fn subcategory_cannot_carry_inline_subcategories() {
    let (engine, db) = engine_with_db().await;

    let snacks = engine
        .add_category(&admin(), "Snacks", &[], None)
        .await
        .unwrap();
    let err = engine
        .add_category(
            &admin(),
            "Chips",
            &["BBQ".to_string()],
            Some(snacks.as_str()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(CategoryStore::new(&db).scan().await.unwrap().len(), 1);

    let chips = engine
        .add_category(
            &admin(),
            "Chips",
            &["".to_string(), "  ".to_string()],
            Some(snacks.as_str()),
        )
        .await
        .unwrap();
    let records = CategoryStore::new(&db).scan().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(
        records
            .iter()
            .all(|c| c.parent_id.as_deref() != Some(chips.as_str()))
    );
}

#[tokio::test]
async fn put_then_get_round_trips_a_record() {
    let (_engine, db) = engine_with_db().await;
    let store = CategoryStore::new(&db);

    let record = Category::new("Frozen".to_string(), "alice".to_string(), Utc::now());
    store.put(&record).await.unwrap();

    let stored = store.get(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.id, record.id);
    assert_eq!(stored.name, "Frozen");
    assert_eq!(stored.kind, CategoryKind::Category);
    assert_eq!(stored.parent_id, None);
    assert_eq!(stored.created_by, "alice");
    assert_eq!(stored.created_at, record.created_at);

    assert!(store.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn cascade_failure_keeps_committed_batches_and_can_be_resumed() {
    let (engine, db) = engine_with_db().await;

    let subs: Vec<String> = (0..60).map(|i| format!("Sub {i}")).collect();
    let id = engine
        .add_category(&admin(), "Big", &subs, None)
        .await
        .unwrap();

    // Let exactly one batch through, then abort every later delete statement.
    for sql in [
        "CREATE TABLE deleted_ids (id TEXT NOT NULL)",
        "CREATE TRIGGER count_deletes AFTER DELETE ON categories \
         BEGIN INSERT INTO deleted_ids VALUES (OLD.id); END",
        "CREATE TRIGGER fail_after_first_batch BEFORE DELETE ON categories \
         WHEN (SELECT COUNT(*) FROM deleted_ids) >= 25 \
         BEGIN SELECT RAISE(ABORT, 'store unavailable'); END",
    ] {
        db.execute_unprepared(sql).await.unwrap();
    }

    let err = engine
        .delete_category(&admin(), &id, Some("category"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(CategoryStore::new(&db).scan().await.unwrap().len(), 36);

    db.execute_unprepared("DROP TRIGGER fail_after_first_batch")
        .await
        .unwrap();

    let outcome = engine
        .delete_category(&admin(), &id, Some("category"))
        .await
        .unwrap();
    assert_eq!(outcome, CategoryDeletion::Cascade { removed: 36 });
    assert!(CategoryStore::new(&db).scan().await.unwrap().is_empty());
}
