//! Participant domain model.
//!
//! # Responsibility
//! - Represent an enrolled contestant and own its catches.
//! - Derive per-participant aggregates (count, total weight).
//!
//! # Invariants
//! - `name` is non-blank; `family_name` may be empty.
//! - Catch order is logging order and is preserved through persistence.
//! - Catch ids are unique within one participant.
//! - Full name is derived on demand, never stored.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

use super::catch::{Catch, CatchUpdate};
use super::record::ParticipantRecord;
use super::validation::{new_participant_id, require_text, ParticipantId, ValidationError};

/// A contestant holding zero or more catches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ParticipantRecord")]
pub struct Participant {
    id: ParticipantId,
    name: String,
    family_name: String,
    catches: Vec<Catch>,
}

impl Participant {
    /// Creates a participant with a fresh id and no catches.
    ///
    /// # Errors
    /// - `EmptyField("name")` when `name` is blank.
    pub fn new(name: &str, family_name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_participant_id(),
            name: require_text("name", name)?,
            family_name: family_name.trim().to_string(),
            catches: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Display name: `"name family_name"`, or just `name` without a family name.
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.family_name)
        }
    }

    /// Catches in logging order.
    pub fn catches(&self) -> &[Catch] {
        &self.catches
    }

    /// Appends `catch` after the ones already logged.
    ///
    /// # Errors
    /// - `DuplicateId` when a catch with the same id is already held.
    pub fn add_catch(&mut self, catch: Catch) -> Result<(), ValidationError> {
        if self.find_catch(catch.id()).is_some() {
            return Err(ValidationError::DuplicateId(catch.id().to_string()));
        }
        self.catches.push(catch);
        Ok(())
    }

    /// Removes the catch with `catch_id`.
    ///
    /// Returns `false` when no such catch exists, so repeated calls are safe.
    pub fn remove_catch(&mut self, catch_id: &str) -> bool {
        match self.catches.iter().position(|catch| catch.id() == catch_id) {
            Some(index) => {
                self.catches.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn find_catch(&self, catch_id: &str) -> Option<&Catch> {
        self.catches.iter().find(|catch| catch.id() == catch_id)
    }

    /// Applies `update` to the catch with `catch_id`.
    ///
    /// Returns `false` when no such catch exists. Invalid weights inside
    /// `update` are ignored per [`Catch::update`].
    pub fn update_catch(&mut self, catch_id: &str, update: CatchUpdate) -> bool {
        match self.catches.iter_mut().find(|catch| catch.id() == catch_id) {
            Some(catch) => {
                catch.update(update);
                true
            }
            None => false,
        }
    }

    pub fn total_catches(&self) -> usize {
        self.catches.len()
    }

    /// Sum of catch weights in grams; `0.0` without catches.
    pub fn total_weight(&self) -> f64 {
        self.catches.iter().map(Catch::weight).sum()
    }

    pub fn heaviest_catch(&self) -> Option<&Catch> {
        self.catches
            .iter()
            .max_by(|left, right| left.weight().total_cmp(&right.weight()))
    }
}

impl From<&Participant> for ParticipantRecord {
    fn from(value: &Participant) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            family_name: value.family_name.clone(),
            catches: value.catches.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<ParticipantRecord> for Participant {
    type Error = ValidationError;

    fn try_from(value: ParticipantRecord) -> Result<Self, Self::Error> {
        if value.id.trim().is_empty() {
            return Err(ValidationError::MalformedRecord(
                "participant record without id".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let mut catches = Vec::with_capacity(value.catches.len());
        for record in value.catches {
            let catch = Catch::try_from(record)?;
            if !seen.insert(catch.id().to_string()) {
                return Err(ValidationError::DuplicateId(catch.id().to_string()));
            }
            catches.push(catch);
        }

        Ok(Self {
            id: value.id,
            name: require_text("name", &value.name)?,
            family_name: value.family_name.trim().to_string(),
            catches,
        })
    }
}

impl Serialize for Participant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ParticipantRecord::from(self).serialize(serializer)
    }
}
