//! Full CRUD lifecycle against an in-memory store.

use user_db_core::{Database, NewUser, UserChanges};

use super::helpers::sample_user;

#[test]
fn test_full_crud_lifecycle() {
    let db = Database::new();

    let id = db.insert(sample_user("Test User")).unwrap();
    let user = db.select_by_id(id).unwrap().expect("created user is readable");
    assert_eq!(user.name, "Test User");
    assert_eq!(user.email, "testuser@example.com");

    let changes = UserChanges {
        name: Some("Updated User".to_string()),
        email: Some("updated@example.com".to_string()),
        pwd: Some("newpassword".to_string()),
        mobile: Some("0987654321".to_string()),
    };
    assert!(db.update_by_id(id, changes).unwrap());

    let user = db.select_by_id(id).unwrap().unwrap();
    assert_eq!(
        user.as_row(),
        (id, "Updated User", "updated@example.com", "newpassword", "0987654321")
    );

    assert!(db.delete_by_id(id).unwrap());
    assert!(db.select_by_id(id).unwrap().is_none());
    assert_eq!(db.count().unwrap(), 0);
}

#[test]
fn test_listing_after_many_inserts() {
    let db = Database::new();
    for i in 0..50 {
        db.insert(sample_user(&format!("user{}", i))).unwrap();
    }
    let users = db.select_all().unwrap();
    assert_eq!(users.len(), 50);
    assert!(users.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn test_ids_are_unique_and_not_reused() {
    let db = Database::new();
    let a = db.insert(NewUser::default()).unwrap();
    let b = db.insert(NewUser::default()).unwrap();
    assert_ne!(a, b);

    db.delete_by_id(b).unwrap();
    let c = db.insert(NewUser::default()).unwrap();
    assert_ne!(c, a);
    assert_ne!(c, b);
}

#[test]
fn test_missing_rows_are_left_alone() {
    let db = Database::new();
    let id = db.insert(sample_user("alice")).unwrap();

    let changes = UserChanges {
        name: Some("No User".to_string()),
        ..Default::default()
    };
    assert!(!db.update_by_id(999, changes).unwrap());
    assert!(!db.delete_by_id(999).unwrap());

    let users = db.select_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, id);
    assert_eq!(users[0].name, "alice");
}
