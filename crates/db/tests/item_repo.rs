//! Integration tests for the PostgreSQL item repository.
//!
//! Each test gets a fresh database with the migrations applied, created on
//! the server named by `DATABASE_URL`.

use grocerific_core::validation::ItemFields;
use grocerific_db::{ItemRepo, ItemStore};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fields(name: &str, category: &str, price: &str) -> ItemFields {
    ItemFields {
        name: name.to_string(),
        category: category.to_string(),
        quantity: 1,
        price: price.to_string(),
        description: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn insert_then_read_back(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    let id = repo.insert(&fields("Apples", "Fruits", "2.99")).await.unwrap();

    let item = repo.get_by_id(id).await.unwrap().expect("item should exist");
    assert_eq!(item.id, id);
    assert_eq!(item.name, "Apples");
    assert_eq!(item.price, "2.99");
    assert_eq!(item.description, "");
    assert_eq!(item.created_at, item.updated_at);
}

#[sqlx::test]
async fn price_keeps_two_decimals(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    let id = repo.insert(&fields("Salt", "Pantry", "1.00")).await.unwrap();

    let item = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(item.price, "1.00");
}

#[sqlx::test]
async fn list_is_ordered_by_name(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    for name in ["Milk", "Apples", "Bread"] {
        repo.insert(&fields(name, "Misc", "1.00")).await.unwrap();
    }

    let names: Vec<String> = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, ["Apples", "Bread", "Milk"]);
}

#[sqlx::test]
async fn update_advances_updated_at_only(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    let id = repo.insert(&fields("Apples", "Fruits", "2.99")).await.unwrap();
    let before = repo.get_by_id(id).await.unwrap().unwrap();

    assert!(repo.update(id, &fields("Apples", "Fruits", "3.50")).await.unwrap());

    let after = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.price, "3.50");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[sqlx::test]
async fn missing_rows_report_false(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    assert!(!repo.update(999, &fields("Ghost", "None", "0.01")).await.unwrap());
    assert!(!repo.delete(999).await.unwrap());
    assert!(repo.get_by_id(999).await.unwrap().is_none());
}

#[sqlx::test]
async fn ids_are_not_reused_after_delete(pool: PgPool) {
    let repo = ItemRepo::new(pool);
    let first = repo.insert(&fields("Apples", "Fruits", "2.99")).await.unwrap();
    assert!(repo.delete(first).await.unwrap());

    let second = repo.insert(&fields("Pears", "Fruits", "1.99")).await.unwrap();
    assert!(second > first);
}
