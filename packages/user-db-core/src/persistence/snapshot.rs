//! Snapshot file format.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::DbError;
use crate::model::User;
use crate::table::UserTable;

/// File name of the table snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "users.json";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot as read from disk.
#[derive(Debug, Deserialize)]
pub struct SnapshotFile {
    /// Snapshot version
    pub version: u32,
    /// Id the next insert will receive
    pub next_id: u64,
    /// CRC32 of the serialized `records` array
    pub checksum: u32,
    /// Rows in ascending id order
    pub records: Vec<User>,
}

/// Snapshot as written to disk, borrowing rows from the table.
#[derive(Debug, Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    next_id: u64,
    checksum: u32,
    records: Vec<&'a User>,
}

/// Computes the checksum stored alongside `records`.
fn records_checksum<T: Serialize>(records: &[T]) -> Result<u32, DbError> {
    let bytes =
        serde_json::to_vec(records).map_err(|e| DbError::SerializationError(e.to_string()))?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}

/// Serializes `table` into snapshot bytes.
pub fn encode(table: &UserTable) -> Result<Vec<u8>, DbError> {
    let records: Vec<&User> = table.iter().collect();
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        next_id: table.next_id(),
        checksum: records_checksum(&records)?,
        records,
    };
    serde_json::to_vec_pretty(&snapshot).map_err(|e| DbError::SerializationError(e.to_string()))
}

/// Parses and verifies snapshot bytes.
pub fn decode(bytes: &[u8]) -> Result<UserTable, DbError> {
    let snapshot: SnapshotFile = serde_json::from_slice(bytes)
        .map_err(|e| DbError::DataCorruption(format!("Failed to parse snapshot: {}", e)))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(DbError::DataCorruption(format!(
            "Unsupported snapshot version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let actual = records_checksum(&snapshot.records)?;
    if actual != snapshot.checksum {
        return Err(DbError::DataCorruption(format!(
            "Snapshot checksum mismatch: expected {:#010x}, got {:#010x}",
            snapshot.checksum, actual
        )));
    }

    UserTable::from_parts(snapshot.records, snapshot.next_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;

    fn table_with_rows() -> UserTable {
        let mut table = UserTable::new();
        for name in ["a", "b", "c"] {
            table
                .insert(NewUser {
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        table.remove(2);
        table
    }

    #[test]
    fn test_decode_preserves_rows_and_counter() {
        let table = table_with_rows();
        let restored = decode(&encode(&table).unwrap()).unwrap();

        assert_eq!(restored.next_id(), 4);
        let names: Vec<&str> = restored.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_tampered_record_fails_checksum() {
        let bytes = encode(&table_with_rows()).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["records"][0]["name"] = serde_json::json!("mallory");
        let tampered = serde_json::to_vec(&value).unwrap();

        match decode(&tampered) {
            Err(DbError::DataCorruption(msg)) => assert!(msg.contains("checksum")),
            other => panic!("Expected checksum failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let bytes = encode(&table_with_rows()).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["version"] = serde_json::json!(99);
        let bumped = serde_json::to_vec(&value).unwrap();

        assert!(matches!(decode(&bumped), Err(DbError::DataCorruption(_))));
    }

    #[test]
    fn test_garbage_is_corruption() {
        assert!(matches!(
            decode(b"not json"),
            Err(DbError::DataCorruption(_))
        ));
    }
}
