//! SQLite-backed relationship repository

use crate::{next_revision, StoreError};
use concord_domain::{
    FactionId, Relationship, RelationshipId, RelationshipRepository, RelationshipType,
    RepositoryError,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite-based implementation of `RelationshipRepository`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe, so the connection sits behind a
/// mutex. Commits are therefore serialized, which is what makes the version
/// check in `upsert` race-free.
pub struct SqliteRelationshipRepository {
    conn: Mutex<Connection>,
}

impl SqliteRelationshipRepository {
    /// Open (or create) a repository at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    fn bytes_to_u128(bytes: &[u8]) -> Result<u128, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for identifier, got {}", bytes.len()))
        })?;
        Ok(u128::from_be_bytes(arr))
    }

    /// SQLite integers are signed; versions past `i64::MAX` cannot be stored
    fn version_to_sql(version: u64) -> Result<i64, StoreError> {
        i64::try_from(version).map_err(|_| {
            StoreError::InvalidData(format!("Version {} exceeds the storable range", version))
        })
    }

    fn conversion_error(column: usize, ty: rusqlite::types::Type, err: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
    }

    fn row_to_relationship(row: &Row<'_>) -> rusqlite::Result<Relationship> {
        use rusqlite::types::Type;

        let blob = |idx: usize| -> rusqlite::Result<u128> {
            let bytes: Vec<u8> = row.get(idx)?;
            Self::bytes_to_u128(&bytes).map_err(|e| Self::conversion_error(idx, Type::Blob, e))
        };

        let type_name: String = row.get(3)?;
        let relationship_type = RelationshipType::parse(&type_name).ok_or_else(|| {
            Self::conversion_error(
                3,
                Type::Text,
                StoreError::InvalidData(format!("Unknown relationship type: {}", type_name)),
            )
        })?;

        Ok(Relationship {
            id: RelationshipId::from_value(blob(0)?),
            faction_id: FactionId::from_value(blob(1)?),
            target_id: FactionId::from_value(blob(2)?),
            relationship_type,
            version: u64::try_from(row.get::<_, i64>(4)?).map_err(|_| {
                Self::conversion_error(
                    4,
                    Type::Integer,
                    StoreError::InvalidData("Negative relationship version".to_string()),
                )
            })?,
        })
    }

    fn commit(&self, relationship: Relationship) -> Result<Relationship, RepositoryError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StoreError::from)?;

        let id_bytes = Self::id_to_bytes(relationship.id.value());
        let stored_raw: Option<i64> = tx
            .query_row(
                "SELECT version FROM faction_relationships WHERE id = ?1",
                params![&id_bytes],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;

        let stored = stored_raw
            .map(|v| {
                u64::try_from(v).map_err(|_| {
                    StoreError::InvalidData(format!("Negative version stored for {}", relationship.id))
                })
            })
            .transpose()?;

        let committed = next_revision(relationship, stored)?;
        let version = Self::version_to_sql(committed.version)?;
        let faction_bytes = Self::id_to_bytes(committed.faction_id.value());
        let target_bytes = Self::id_to_bytes(committed.target_id.value());
        let type_name = committed.relationship_type.as_str();

        match stored_raw {
            Some(previous) => {
                tx.execute(
                    "UPDATE faction_relationships
                     SET faction_id = ?2, target_id = ?3, relationship_type = ?4, version = ?5
                     WHERE id = ?1 AND version = ?6",
                    params![
                        &id_bytes,
                        &faction_bytes,
                        &target_bytes,
                        type_name,
                        version,
                        previous,
                    ],
                )
                .map_err(StoreError::from)?;
            }
            None => {
                tx.execute(
                    "INSERT INTO faction_relationships (id, faction_id, target_id, relationship_type, version)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        &id_bytes,
                        &faction_bytes,
                        &target_bytes,
                        type_name,
                        version,
                    ],
                )
                .map_err(StoreError::from)?;
            }
        }

        tx.commit().map_err(StoreError::from)?;
        Ok(committed)
    }
}

impl RelationshipRepository for SqliteRelationshipRepository {
    fn list_all(&self) -> Result<Vec<Relationship>, RepositoryError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, faction_id, target_id, relationship_type, version
                 FROM faction_relationships ORDER BY rowid",
            )
            .map_err(StoreError::from)?;

        let relationships = stmt
            .query_map([], Self::row_to_relationship)
            .map_err(StoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;

        Ok(relationships)
    }

    fn upsert(&self, relationship: Relationship) -> Result<Relationship, RepositoryError> {
        self.commit(relationship)
    }

    fn delete(&self, id: RelationshipId) -> Result<(), RepositoryError> {
        let conn = self.conn.lock();
        let removed = conn
            .execute(
                "DELETE FROM faction_relationships WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
            )
            .map_err(StoreError::from)?;

        if removed == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_bytes() {
        let value = RelationshipId::new().value();
        let bytes = SqliteRelationshipRepository::id_to_bytes(value);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteRelationshipRepository::bytes_to_u128(&bytes).unwrap(), value);
    }

    #[test]
    fn test_short_blob_is_invalid() {
        let result = SqliteRelationshipRepository::bytes_to_u128(&[1, 2, 3]);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_version_out_of_sql_range_is_rejected() {
        let repo = SqliteRelationshipRepository::in_memory().unwrap();
        let rel = Relationship {
            version: i64::MAX as u64,
            ..Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally)
        };

        let err = repo.upsert(rel.clone()).unwrap_err();
        assert!(matches!(err, RepositoryError::Storage { .. }));
        assert!(repo.list_all().unwrap().is_empty());

        let exhausted = Relationship {
            version: u64::MAX,
            ..rel
        };
        assert!(matches!(
            repo.upsert(exhausted),
            Err(RepositoryError::Storage { .. })
        ));
    }

    #[test]
    fn test_unknown_type_fails_load() {
        let repo = SqliteRelationshipRepository::in_memory().unwrap();
        {
            let conn = repo.conn.lock();
            // Bypass the CHECK constraint by recreating the table without it
            conn.execute_batch(
                "DROP TABLE faction_relationships;
                 CREATE TABLE faction_relationships (
                     id BLOB PRIMARY KEY, faction_id BLOB, target_id BLOB,
                     relationship_type TEXT, version INTEGER);",
            )
            .unwrap();
            conn.execute(
                "INSERT INTO faction_relationships VALUES (?1, ?2, ?3, 'NEUTRAL', 1)",
                params![
                    SqliteRelationshipRepository::id_to_bytes(1),
                    SqliteRelationshipRepository::id_to_bytes(2),
                    SqliteRelationshipRepository::id_to_bytes(3),
                ],
            )
            .unwrap();
        }

        let err = repo.list_all().unwrap_err();
        assert!(matches!(err, RepositoryError::Storage { .. }));
    }
}
