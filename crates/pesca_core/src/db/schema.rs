//! Competition store schema.
//!
//! Steps run in version order inside one transaction. `verify` is what the
//! repository calls before touching rows: it checks the columns it selects
//! and the index its listing order relies on.

use super::{AtStage, DbError, DbResult, StoreStage};
use log::info;
use rusqlite::Connection;

const COMPETITIONS_TABLE: &str = "competitions";
const REQUIRED_COLUMNS: &[&str] = &["id", "record", "created_at", "updated_at"];
const CREATED_AT_INDEX: &str = "idx_competitions_created_at";

/// `(version, sql)` pairs; versions strictly increase.
const STEPS: &[(u32, &str)] = &[
    (1, include_str!("migrations/0001_competitions.sql")),
    (2, include_str!("migrations/0002_competitions_created_index.sql")),
];

/// Schema version written by this build.
pub fn current_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Version recorded in the store.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .at(StoreStage::Inspect)
}

/// Runs every step newer than the stored version.
///
/// # Errors
/// - `SchemaVersion` when the store was written by a newer build.
pub(crate) fn upgrade(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let expected = current_version();
    if found > expected {
        return Err(DbError::SchemaVersion { found, expected });
    }

    let pending = STEPS
        .iter()
        .filter(|(version, _)| *version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction().at(StoreStage::Migrate)?;
    for (version, sql) in pending {
        tx.execute_batch(sql).at(StoreStage::Migrate)?;
        tx.pragma_update(None, "user_version", version)
            .at(StoreStage::Migrate)?;
    }
    tx.commit().at(StoreStage::Migrate)?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={expected}");
    Ok(())
}

/// Confirms the store is ready for the competition repository.
///
/// # Errors
/// - `SchemaVersion` when the store is not at [`current_version`].
/// - `MissingSchemaObject` naming the first absent column or index.
pub fn verify(conn: &Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let expected = current_version();
    if found != expected {
        return Err(DbError::SchemaVersion { found, expected });
    }

    let columns = table_columns(conn)?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !columns.iter().any(|column| column == *required))
    {
        return Err(DbError::MissingSchemaObject(*missing));
    }

    if !index_exists(conn, CREATED_AT_INDEX)? {
        return Err(DbError::MissingSchemaObject(CREATED_AT_INDEX));
    }
    Ok(())
}

fn table_columns(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1);")
        .at(StoreStage::Inspect)?;
    let columns = stmt
        .query_map([COMPETITIONS_TABLE], |row| row.get::<_, String>(0))
        .at(StoreStage::Inspect)?
        .collect::<Result<Vec<_>, _>>()
        .at(StoreStage::Inspect)?;
    Ok(columns)
}

fn index_exists(conn: &Connection, index: &str) -> DbResult<bool> {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type = 'index' AND name = ?1 AND tbl_name = ?2
        );",
        [index, COMPETITIONS_TABLE],
        |row| row.get(0),
    )
    .at(StoreStage::Inspect)
}
