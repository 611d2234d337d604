//! Competition use-case service.
//!
//! # Responsibility
//! - Provide the entry points behind every user action: create/edit/delete
//!   competitions, enroll participants, log/edit/delete catches, finalize.
//! - Persist the whole aggregate after each successful mutation.
//!
//! # Invariants
//! - Target ids are passed per call; the service keeps no selection state.
//! - Only a mutation that succeeded and changed the aggregate is saved.
//! - Log lines carry ids and counts only, never user-entered text.

use crate::model::catch::{Catch, CatchUpdate};
use crate::model::competition::{Competition, CompetitionStatistics};
use crate::model::participant::Participant;
use crate::model::validation::{CompetitionError, CompetitionId, ParticipantId, ValidationError};
use crate::repo::competition_repo::{CompetitionRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for competition use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input or stored record failed domain validation.
    Validation(ValidationError),
    /// Mutation attempted on a finalized competition.
    Finalized(CompetitionId),
    CompetitionNotFound(CompetitionId),
    ParticipantNotFound(ParticipantId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Finalized(id) => {
                write!(f, "competition {id} is finalized and can no longer change")
            }
            Self::CompetitionNotFound(id) => write!(f, "competition not found: {id}"),
            Self::ParticipantNotFound(id) => write!(f, "participant not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CompetitionError> for ServiceError {
    fn from(value: CompetitionError) -> Self {
        match value {
            CompetitionError::Validation(err) => Self::Validation(err),
            CompetitionError::Finalized(id) => Self::Finalized(id),
            CompetitionError::ParticipantNotFound(id) => Self::ParticipantNotFound(id),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Descriptive fields of a competition, as entered in create/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitionDetails {
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub location: String,
    pub description: String,
}

/// Owned ranking row for callers that outlive the loaded aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub position: usize,
    pub participant_id: ParticipantId,
    pub full_name: String,
    pub total_weight: f64,
    pub total_catches: usize,
}

/// Competition service facade over repository implementations.
pub struct CompetitionService<R: CompetitionRepository> {
    repo: R,
}

impl<R: CompetitionRepository> CompetitionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and stores a new active competition.
    pub fn create_competition(&self, details: &CompetitionDetails) -> ServiceResult<Competition> {
        let competition = Competition::new(
            &details.name,
            &details.date,
            &details.location,
            &details.description,
        )?;
        self.repo.put(&competition)?;
        info!(
            "event=competition_create module=service status=ok competition_id={}",
            competition.id()
        );
        Ok(competition)
    }

    /// Lists stored competitions in creation order.
    pub fn list_competitions(&self) -> ServiceResult<Vec<Competition>> {
        Ok(self.repo.get_all()?)
    }

    /// Gets one competition; `None` when the id is unknown.
    pub fn get_competition(&self, competition_id: &str) -> ServiceResult<Option<Competition>> {
        Ok(self.repo.get_by_id(competition_id)?)
    }

    /// Replaces name/date/location/description, keeping participants.
    pub fn update_competition_details(
        &self,
        competition_id: &str,
        details: &CompetitionDetails,
    ) -> ServiceResult<Competition> {
        self.mutate(competition_id, "competition_update", |competition| {
            competition.update_details(
                &details.name,
                &details.date,
                &details.location,
                &details.description,
            )?;
            Ok(competition.clone())
        })
    }

    /// Deletes a stored competition. Returns `false` when it did not exist.
    pub fn delete_competition(&self, competition_id: &str) -> ServiceResult<bool> {
        let removed = self.repo.delete(competition_id)?;
        info!(
            "event=competition_delete module=service status=ok competition_id={competition_id} removed={removed}"
        );
        Ok(removed)
    }

    /// Enrolls a new participant and returns it.
    pub fn enroll_participant(
        &self,
        competition_id: &str,
        name: &str,
        family_name: &str,
    ) -> ServiceResult<Participant> {
        self.mutate(competition_id, "participant_enroll", |competition| {
            let participant_id = competition.enroll(name, family_name)?;
            competition
                .find_participant_by_id(&participant_id)
                .cloned()
                .ok_or(ServiceError::ParticipantNotFound(participant_id))
        })
    }

    /// Removes a participant. `Ok(false)` when not enrolled.
    pub fn remove_participant(
        &self,
        competition_id: &str,
        participant_id: &str,
    ) -> ServiceResult<bool> {
        self.mutate(competition_id, "participant_remove", |competition| {
            Ok(competition.remove_participant(participant_id)?)
        })
    }

    /// Logs a new catch for a participant and returns it.
    pub fn log_catch(
        &self,
        competition_id: &str,
        participant_id: &str,
        weight: f64,
        fish_type: &str,
    ) -> ServiceResult<Catch> {
        self.mutate(competition_id, "catch_log", |competition| {
            let catch = Catch::new(weight, fish_type)?;
            competition.log_catch(participant_id, catch.clone())?;
            Ok(catch)
        })
    }

    /// Edits a catch. `Ok(false)` when participant or catch is missing.
    pub fn update_catch(
        &self,
        competition_id: &str,
        participant_id: &str,
        catch_id: &str,
        update: CatchUpdate,
    ) -> ServiceResult<bool> {
        self.mutate(competition_id, "catch_update", |competition| {
            Ok(competition.update_catch(participant_id, catch_id, update)?)
        })
    }

    /// Deletes a catch. `Ok(false)` when participant or catch is missing.
    pub fn remove_catch(
        &self,
        competition_id: &str,
        participant_id: &str,
        catch_id: &str,
    ) -> ServiceResult<bool> {
        self.mutate(competition_id, "catch_remove", |competition| {
            Ok(competition.remove_catch(participant_id, catch_id)?)
        })
    }

    /// Finalizes a competition. Repeating the call is a no-op.
    pub fn finalize_competition(&self, competition_id: &str) -> ServiceResult<Competition> {
        self.mutate(competition_id, "competition_finalize", |competition| {
            competition.finalize();
            Ok(competition.clone())
        })
    }

    /// Computes the ranking of a stored competition.
    pub fn ranking(&self, competition_id: &str) -> ServiceResult<Vec<RankingRow>> {
        let competition = self.load(competition_id)?;
        Ok(competition
            .ranking()
            .into_iter()
            .map(|entry| RankingRow {
                position: entry.position,
                participant_id: entry.participant.id().to_string(),
                full_name: entry.participant.full_name(),
                total_weight: entry.total_weight,
                total_catches: entry.total_catches,
            })
            .collect())
    }

    /// Computes statistics of a stored competition.
    pub fn statistics(&self, competition_id: &str) -> ServiceResult<CompetitionStatistics> {
        Ok(self.load(competition_id)?.statistics())
    }

    fn load(&self, competition_id: &str) -> ServiceResult<Competition> {
        self.repo
            .get_by_id(competition_id)?
            .ok_or_else(|| ServiceError::CompetitionNotFound(competition_id.to_string()))
    }

    fn mutate<T>(
        &self,
        competition_id: &str,
        event: &'static str,
        apply: impl FnOnce(&mut Competition) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut competition = self.load(competition_id)?;
        let before = competition.clone();
        match apply(&mut competition) {
            Ok(value) if competition == before => {
                info!(
                    "event={event} module=service status=unchanged competition_id={competition_id}"
                );
                Ok(value)
            }
            Ok(value) => {
                self.repo.put(&competition)?;
                info!(
                    "event={event} module=service status=ok competition_id={competition_id} participants={} catches={}",
                    competition.participants().len(),
                    competition.total_catches()
                );
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event={event} module=service status=rejected competition_id={competition_id} error_code={}",
                    error_code(&err)
                );
                Err(err)
            }
        }
    }
}

fn error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Validation(_) => "validation_failed",
        ServiceError::Finalized(_) => "competition_finalized",
        ServiceError::CompetitionNotFound(_) => "competition_not_found",
        ServiceError::ParticipantNotFound(_) => "participant_not_found",
        ServiceError::Repo(_) => "repo_failed",
    }
}
