//! Catch domain model.
//!
//! # Responsibility
//! - Represent one weighed fish logged for a participant.
//! - Apply the partial-update policy used by catch edit forms.
//!
//! # Invariants
//! - `weight` is strictly positive at creation and after every update.
//! - `id` and `timestamp` are assigned once and never change.
//! - `fish_type` is stored trimmed; blank means unspecified.
//! - Reconstruction from a stored record does not re-check `weight`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::record::CatchRecord;
use super::validation::{is_valid_weight, new_catch_id, require_weight, CatchId, ValidationError};

/// One logged, weighed fish.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CatchRecord")]
pub struct Catch {
    id: CatchId,
    weight: f64,
    fish_type: String,
    timestamp: DateTime<Utc>,
}

/// Partial edit for an existing catch.
///
/// `None` leaves the field untouched. `fish_type: Some(String::new())`
/// clears the label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchUpdate {
    pub weight: Option<f64>,
    pub fish_type: Option<String>,
}

impl Catch {
    /// Creates a catch with a fresh id, stamped with the current instant.
    ///
    /// # Errors
    /// - `NonPositiveWeight` when `weight` is zero, negative or not finite.
    pub fn new(weight: f64, fish_type: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_id(new_catch_id(), weight, fish_type, Utc::now())
    }

    /// Creates a catch with caller-provided identity, used by import paths.
    pub fn with_id(
        id: impl Into<CatchId>,
        weight: f64,
        fish_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyField("catch id"));
        }
        Ok(Self {
            id,
            weight: require_weight(weight)?,
            fish_type: fish_type.into().trim().to_string(),
            timestamp,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Weight in grams.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Free-text species label; empty when unspecified.
    pub fn fish_type(&self) -> &str {
        &self.fish_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Applies a partial edit.
    ///
    /// An invalid weight is ignored and the previous weight kept, so a
    /// half-filled edit form never fails the whole update.
    pub fn update(&mut self, update: CatchUpdate) {
        if let Some(weight) = update.weight.filter(|value| is_valid_weight(*value)) {
            self.weight = weight;
        }
        if let Some(fish_type) = update.fish_type {
            self.fish_type = fish_type.trim().to_string();
        }
    }
}

impl From<&Catch> for CatchRecord {
    fn from(value: &Catch) -> Self {
        Self {
            id: value.id.clone(),
            weight: value.weight,
            fish_type: value.fish_type.clone(),
            timestamp: value.timestamp,
        }
    }
}

impl TryFrom<CatchRecord> for Catch {
    type Error = ValidationError;

    fn try_from(value: CatchRecord) -> Result<Self, Self::Error> {
        if value.id.trim().is_empty() {
            return Err(ValidationError::MalformedRecord(
                "catch record without id".to_string(),
            ));
        }
        Ok(Self {
            id: value.id,
            weight: value.weight,
            fish_type: value.fish_type,
            timestamp: value.timestamp,
        })
    }
}

impl Serialize for Catch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CatchRecord::from(self).serialize(serializer)
    }
}
