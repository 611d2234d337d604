//! Competition aggregate root.
//!
//! # Responsibility
//! - Own participants (and through them, catches) of one tournament.
//! - Enforce the Active -> Finalized lifecycle.
//! - Compute ranking and competition-wide statistics.
//!
//! # Invariants
//! - `name`, `location` are non-blank and `date` is a valid calendar day,
//!   both at construction and after `update_details`.
//! - Participant ids are unique within one competition.
//! - Once finalized, participant and catch mutations are rejected with
//!   `CompetitionError::Finalized`; there is no way back to Active.
//! - Ranking and statistics never reorder or mutate stored participants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use super::catch::{Catch, CatchUpdate};
use super::participant::Participant;
use super::record::{CompetitionRecord, ParticipantRecord};
use super::validation::{
    new_competition_id, parse_competition_date, require_text, CompetitionError, CompetitionId,
    ParticipantId, ValidationError,
};

const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";
const PODIUM_SIZE: usize = 3;

/// Lifecycle state of a competition.
///
/// Serialized with the stored labels `"En curso"` / `"Finalizado"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionState {
    #[default]
    #[serde(rename = "En curso")]
    Active,
    #[serde(rename = "Finalizado")]
    Finalized,
}

impl Display for CompetitionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Finalized => write!(f, "Finalized"),
        }
    }
}

/// One row of the weight-based ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEntry<'a> {
    /// 1-based placement.
    pub position: usize,
    pub participant: &'a Participant,
    pub total_weight: f64,
    pub total_catches: usize,
}

impl RankingEntry<'_> {
    /// Positions 1..=3 are shown on the podium, the rest in the table.
    pub fn is_podium(&self) -> bool {
        self.position <= PODIUM_SIZE
    }
}

/// A catch together with the participant who logged it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchListing<'a> {
    pub participant: &'a Participant,
    pub catch: &'a Catch,
}

/// Competition-wide aggregates. All weights are grams.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompetitionStatistics {
    pub participant_count: usize,
    pub catch_count: usize,
    pub total_weight: f64,
    /// `total_weight / catch_count`, `0.0` without catches.
    pub average_weight: f64,
    /// Heaviest single catch, `0.0` without catches.
    pub heaviest_catch: f64,
    /// Lightest single catch, `0.0` without catches.
    pub lightest_catch: f64,
}

impl CompetitionStatistics {
    /// Average weight with two decimals, e.g. `825.00`.
    pub fn average_weight_display(&self) -> String {
        format!("{:.2}", self.average_weight)
    }
}

/// Tournament aggregate root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CompetitionRecord")]
pub struct Competition {
    id: CompetitionId,
    name: String,
    date: NaiveDate,
    location: String,
    description: String,
    state: CompetitionState,
    participants: Vec<Participant>,
}

impl Competition {
    /// Creates an active competition with a fresh id and no participants.
    ///
    /// # Errors
    /// - `EmptyField` when `name`, `date` or `location` is blank.
    /// - `InvalidDate` when `date` is not a calendar date.
    pub fn new(
        name: &str,
        date: &str,
        location: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let name = require_text("name", name)?;
        let date = parse_competition_date(date)?;
        let location = require_text("location", location)?;

        Ok(Self {
            id: new_competition_id(),
            name,
            date,
            location,
            description: description.trim().to_string(),
            state: CompetitionState::Active,
            participants: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> CompetitionState {
        self.state
    }

    /// Participants in enrollment order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Replaces the descriptive fields, validating like [`Competition::new`].
    ///
    /// Allowed in any state: it does not touch participants or catches.
    /// Nothing changes when validation fails.
    pub fn update_details(
        &mut self,
        name: &str,
        date: &str,
        location: &str,
        description: &str,
    ) -> Result<(), ValidationError> {
        let name = require_text("name", name)?;
        let date = parse_competition_date(date)?;
        let location = require_text("location", location)?;

        self.name = name;
        self.date = date;
        self.location = location;
        self.description = description.trim().to_string();
        Ok(())
    }

    /// Appends an already-built participant.
    ///
    /// # Errors
    /// - `Finalized` when the competition is closed.
    /// - `DuplicateId` when a participant with the same id is enrolled.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), CompetitionError> {
        self.ensure_active()?;
        if self.find_participant_by_id(participant.id()).is_some() {
            return Err(ValidationError::DuplicateId(participant.id().to_string()).into());
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Builds and enrolls a participant, returning the new id.
    pub fn enroll(
        &mut self,
        name: &str,
        family_name: &str,
    ) -> Result<ParticipantId, CompetitionError> {
        self.ensure_active()?;
        let participant = Participant::new(name, family_name)?;
        let id = participant.id().to_string();
        self.add_participant(participant)?;
        Ok(id)
    }

    pub fn find_participant_by_id(&self, participant_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.id() == participant_id)
    }

    /// Removes a participant and all of its catches.
    ///
    /// Returns `Ok(false)` when no such participant exists.
    pub fn remove_participant(&mut self, participant_id: &str) -> Result<bool, CompetitionError> {
        self.ensure_active()?;
        match self
            .participants
            .iter()
            .position(|participant| participant.id() == participant_id)
        {
            Some(index) => {
                self.participants.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Appends `catch` to the participant's catch list.
    ///
    /// # Errors
    /// - `Finalized` when the competition is closed.
    /// - `ParticipantNotFound` when `participant_id` is not enrolled.
    /// - `DuplicateId` when the participant already holds a catch with that id.
    pub fn log_catch(&mut self, participant_id: &str, catch: Catch) -> Result<(), CompetitionError> {
        self.ensure_active()?;
        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| CompetitionError::ParticipantNotFound(participant_id.to_string()))?;
        participant.add_catch(catch)?;
        Ok(())
    }

    /// Edits one catch. `Ok(false)` when participant or catch is missing.
    pub fn update_catch(
        &mut self,
        participant_id: &str,
        catch_id: &str,
        update: CatchUpdate,
    ) -> Result<bool, CompetitionError> {
        self.ensure_active()?;
        Ok(self
            .participant_mut(participant_id)
            .is_some_and(|participant| participant.update_catch(catch_id, update)))
    }

    /// Deletes one catch. `Ok(false)` when participant or catch is missing.
    pub fn remove_catch(
        &mut self,
        participant_id: &str,
        catch_id: &str,
    ) -> Result<bool, CompetitionError> {
        self.ensure_active()?;
        Ok(self
            .participant_mut(participant_id)
            .is_some_and(|participant| participant.remove_catch(catch_id)))
    }

    /// Closes the competition. Calling it again is a no-op.
    pub fn finalize(&mut self) {
        self.state = CompetitionState::Finalized;
    }

    pub fn is_finalized(&self) -> bool {
        self.state == CompetitionState::Finalized
    }

    pub fn total_catches(&self) -> usize {
        self.participants.iter().map(Participant::total_catches).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.participants.iter().map(Participant::total_weight).sum()
    }

    /// Orders participants by total weight (desc), then catch count (desc).
    ///
    /// Exact ties keep enrollment order.
    pub fn ranking(&self) -> Vec<RankingEntry<'_>> {
        let mut rows = self
            .participants
            .iter()
            .map(|participant| {
                (
                    participant,
                    participant.total_weight(),
                    participant.total_catches(),
                )
            })
            .collect::<Vec<_>>();

        rows.sort_by(|left, right| {
            right
                .1
                .total_cmp(&left.1)
                .then_with(|| right.2.cmp(&left.2))
        });

        rows.into_iter()
            .enumerate()
            .map(
                |(index, (participant, total_weight, total_catches))| RankingEntry {
                    position: index + 1,
                    participant,
                    total_weight,
                    total_catches,
                },
            )
            .collect()
    }

    /// First ranking entry, `None` without participants.
    pub fn winner(&self) -> Option<RankingEntry<'_>> {
        self.ranking().into_iter().next()
    }

    /// Every catch of every participant, heaviest first.
    pub fn catches_by_weight(&self) -> Vec<CatchListing<'_>> {
        let mut listings = self
            .participants
            .iter()
            .flat_map(|participant| {
                participant
                    .catches()
                    .iter()
                    .map(move |catch| CatchListing { participant, catch })
            })
            .collect::<Vec<_>>();
        listings.sort_by(|left, right| right.catch.weight().total_cmp(&left.catch.weight()));
        listings
    }

    pub fn statistics(&self) -> CompetitionStatistics {
        let weights = self
            .participants
            .iter()
            .flat_map(|participant| participant.catches().iter().map(Catch::weight))
            .collect::<Vec<_>>();

        let catch_count = weights.len();
        let total_weight: f64 = weights.iter().sum();
        let average_weight = if catch_count == 0 {
            0.0
        } else {
            total_weight / catch_count as f64
        };

        CompetitionStatistics {
            participant_count: self.participants.len(),
            catch_count,
            total_weight,
            average_weight,
            heaviest_catch: weights.iter().copied().reduce(f64::max).unwrap_or(0.0),
            lightest_catch: weights.iter().copied().reduce(f64::min).unwrap_or(0.0),
        }
    }

    /// Builds the persisted record (deep copy of the whole tree).
    pub fn to_record(&self) -> CompetitionRecord {
        CompetitionRecord::from(self)
    }

    /// Rebuilds the aggregate from a persisted record.
    pub fn from_record(record: CompetitionRecord) -> Result<Self, ValidationError> {
        Self::try_from(record)
    }

    /// Serializes to the persisted JSON document.
    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string(self)
            .map_err(|err| ValidationError::MalformedRecord(err.to_string()))
    }

    /// Parses and validates a persisted JSON document.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|err| ValidationError::MalformedRecord(err.to_string()))
    }

    fn ensure_active(&self) -> Result<(), CompetitionError> {
        if self.is_finalized() {
            return Err(CompetitionError::Finalized(self.id.clone()));
        }
        Ok(())
    }

    fn participant_mut(&mut self, participant_id: &str) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|participant| participant.id() == participant_id)
    }
}

impl From<&Competition> for CompetitionRecord {
    fn from(value: &Competition) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            date: value.date.format(RECORD_DATE_FORMAT).to_string(),
            location: value.location.clone(),
            description: value.description.clone(),
            state: value.state,
            participants: value
                .participants
                .iter()
                .map(ParticipantRecord::from)
                .collect(),
        }
    }
}

impl TryFrom<CompetitionRecord> for Competition {
    type Error = ValidationError;

    fn try_from(value: CompetitionRecord) -> Result<Self, Self::Error> {
        if value.id.trim().is_empty() {
            return Err(ValidationError::MalformedRecord(
                "competition record without id".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(value.participants.len());
        for record in value.participants {
            let participant = Participant::try_from(record)?;
            if !seen.insert(participant.id().to_string()) {
                return Err(ValidationError::DuplicateId(participant.id().to_string()));
            }
            participants.push(participant);
        }

        Ok(Self {
            id: value.id,
            name: require_text("name", &value.name)?,
            date: parse_competition_date(&value.date)?,
            location: require_text("location", &value.location)?,
            description: value.description.trim().to_string(),
            state: value.state,
            participants,
        })
    }
}

impl Serialize for Competition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CompetitionRecord::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::{Competition, CompetitionState};

    #[test]
    fn state_labels_match_stored_values() {
        assert_eq!(
            serde_json::to_string(&CompetitionState::Active).unwrap(),
            "\"En curso\""
        );
        assert_eq!(
            serde_json::to_string(&CompetitionState::Finalized).unwrap(),
            "\"Finalizado\""
        );
    }

    #[test]
    fn update_details_keeps_previous_values_on_failure() {
        let mut competition = Competition::new("Spring Open", "2024-05-10", "Lake A", "").unwrap();
        assert!(competition
            .update_details("Renamed", "2024-13-01", "Lake B", "")
            .is_err());
        assert_eq!(competition.name(), "Spring Open");
        assert_eq!(competition.location(), "Lake A");
    }
}
