//! Competition repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Upsert, list, fetch and delete competition records keyed by id.
//! - Keep SQL and JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - `put` replaces the whole stored tree; last write wins.
//! - `get_all` returns records in creation order.
//! - Stored JSON that fails domain validation surfaces as
//!   `RepoError::Validation`.

use crate::db::schema::verify;
use crate::db::{DbError, StoreStage};
use crate::model::competition::Competition;
use crate::model::validation::{CompetitionId, ValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const COMPETITION_SELECT_SQL: &str = "SELECT id, record FROM competitions";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for competition persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Stored record could not be rebuilt into a valid aggregate.
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted competition data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite {
            stage: StoreStage::Query,
            source: value,
        })
    }
}

/// Storage gateway for whole competition records.
pub trait CompetitionRepository {
    /// Inserts or replaces the record keyed by `competition.id()`.
    fn put(&self, competition: &Competition) -> RepoResult<()>;
    fn get_all(&self) -> RepoResult<Vec<Competition>>;
    fn get_by_id(&self, id: &str) -> RepoResult<Option<Competition>>;
    /// Returns whether a record was removed.
    fn delete(&self, id: &str) -> RepoResult<bool>;
}

/// SQLite-backed competition repository.
pub struct SqliteCompetitionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompetitionRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `Db` when the store schema is outdated or lacks a required object.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify(conn)?;
        Ok(Self { conn })
    }
}

impl CompetitionRepository for SqliteCompetitionRepository<'_> {
    fn put(&self, competition: &Competition) -> RepoResult<()> {
        let record = competition.to_json()?;
        self.conn.execute(
            "INSERT INTO competitions (id, record)
             VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                record = excluded.record,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![competition.id(), record],
        )?;
        Ok(())
    }

    fn get_all(&self) -> RepoResult<Vec<Competition>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMPETITION_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut competitions = Vec::new();

        while let Some(row) = rows.next()? {
            competitions.push(parse_competition_row(row)?);
        }

        Ok(competitions)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Competition>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPETITION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_competition_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM competitions WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_competition_row(row: &Row<'_>) -> RepoResult<Competition> {
    let id: CompetitionId = row.get("id")?;
    let record: String = row.get("record")?;
    let competition = Competition::from_json(&record)?;

    if competition.id() != id {
        return Err(RepoError::InvalidData(format!(
            "record id `{}` does not match row id `{id}`",
            competition.id()
        )));
    }

    Ok(competition)
}
