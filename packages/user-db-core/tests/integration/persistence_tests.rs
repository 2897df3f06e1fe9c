//! Persistence integration tests.

use std::fs;

use tempfile::tempdir;

use user_db_core::config::DbConfig;
use user_db_core::persistence::SNAPSHOT_FILE;
use user_db_core::{Database, DbError};

use super::helpers::sample_user;

#[test]
fn test_reopen_restores_rows_and_counter() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = DbConfig::with_data_dir(temp_dir.path());

    let (kept, dropped) = {
        let db = Database::open(&config)?;
        let kept = db.insert(sample_user("kept"))?;
        let dropped = db.insert(sample_user("dropped"))?;
        db.delete_by_id(dropped)?;
        (kept, dropped)
    };

    let db = Database::open(&config)?;
    let users = db.select_all()?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, kept);
    assert_eq!(users[0].name, "kept");

    let next = db.insert(sample_user("next"))?;
    assert!(next > dropped);
    Ok(())
}

#[test]
fn test_truncated_snapshot_refuses_to_open() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = DbConfig::with_data_dir(temp_dir.path());
    {
        let db = Database::open(&config)?;
        db.insert(sample_user("a"))?;
    }

    let path = temp_dir.path().join(SNAPSHOT_FILE);
    let bytes = fs::read(&path)?;
    fs::write(&path, &bytes[..bytes.len() / 2])?;

    assert!(matches!(
        Database::open(&config),
        Err(DbError::DataCorruption(_))
    ));
    Ok(())
}

#[test]
fn test_reads_do_not_write_snapshot() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Database::open(&DbConfig::with_data_dir(temp_dir.path()))?;

    db.select_all()?;
    db.select_by_id(1)?;
    assert!(!db.delete_by_id(1)?);
    assert!(!temp_dir.path().join(SNAPSHOT_FILE).exists());
    Ok(())
}
