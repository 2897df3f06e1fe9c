//! Concurrent writers against one shared handle.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use user_db_core::Database;

use super::helpers::sample_user;

#[test]
fn test_concurrent_inserts_get_distinct_ids() {
    let db = Arc::new(Database::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                (0..100)
                    .map(|i| db.insert(sample_user(&format!("t{}-{}", t, i))).unwrap())
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "id {} issued twice", id);
        }
    }
    assert_eq!(ids.len(), 800);
    assert_eq!(db.count().unwrap(), 800);
}

#[test]
fn test_concurrent_deletes_succeed_once() {
    let db = Arc::new(Database::new());
    let id = db.insert(sample_user("target")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || db.delete_by_id(id).unwrap())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|deleted| *deleted)
        .count();
    assert_eq!(successes, 1);
}
