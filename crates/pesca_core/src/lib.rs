//! Core domain logic for fishing-tournament records.
//! This crate is the single source of truth for competition invariants,
//! ranking and statistics.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::catch::{Catch, CatchUpdate};
pub use model::competition::{
    CatchListing, Competition, CompetitionState, CompetitionStatistics, RankingEntry,
};
pub use model::participant::Participant;
pub use model::record::{CatchRecord, CompetitionRecord, ParticipantRecord};
pub use model::validation::{
    CatchId, CompetitionError, CompetitionId, ParticipantId, ValidationError,
};
pub use repo::competition_repo::{
    CompetitionRepository, RepoError, RepoResult, SqliteCompetitionRepository,
};
pub use report::summary::{report_file_name, CompetitionReport};
pub use service::competition_service::{
    CompetitionDetails, CompetitionService, RankingRow, ServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
