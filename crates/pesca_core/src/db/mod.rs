//! Competition store on SQLite.
//!
//! # Responsibility
//! - Open the store and bring its schema to the version this build writes.
//! - Tell callers which store operation failed, not only that SQLite did.
//!
//! # Invariants
//! - Schema version is mirrored to `PRAGMA user_version`.
//! - A connection returned by `open_db*` has passed [`schema::verify`].

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store operation during which SQLite reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStage {
    Open,
    Configure,
    Migrate,
    Inspect,
    Query,
}

impl Display for StoreStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Configure => "configure",
            Self::Migrate => "migrate",
            Self::Inspect => "inspect",
            Self::Query => "query",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub enum DbError {
    Sqlite {
        stage: StoreStage,
        source: rusqlite::Error,
    },
    /// Stored schema version differs from the one this build reads.
    SchemaVersion { found: u32, expected: u32 },
    /// Table column or index the repository depends on is absent.
    MissingSchemaObject(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite { stage, source } => {
                write!(f, "competition store {stage} failed: {source}")
            }
            Self::SchemaVersion { found, expected } => write!(
                f,
                "competition store schema version {found} does not match supported version {expected}"
            ),
            Self::MissingSchemaObject(name) => {
                write!(f, "competition store is missing `{name}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite { source, .. } => Some(source),
            Self::SchemaVersion { .. } | Self::MissingSchemaObject(_) => None,
        }
    }
}

/// Tags a SQLite result with the store stage it belongs to.
pub(crate) trait AtStage<T> {
    fn at(self, stage: StoreStage) -> DbResult<T>;
}

impl<T> AtStage<T> for rusqlite::Result<T> {
    fn at(self, stage: StoreStage) -> DbResult<T> {
        self.map_err(|source| DbError::Sqlite { stage, source })
    }
}
