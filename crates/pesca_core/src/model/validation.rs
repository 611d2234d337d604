//! Shared validation rules, identifiers and domain errors.
//!
//! # Responsibility
//! - Generate stable string identifiers for competitions, participants and
//!   catches.
//! - Hold the field-level checks reused by every entity constructor.
//! - Define the error vocabulary raised by the domain model.
//!
//! # Invariants
//! - Required text fields are rejected when blank after trim.
//! - A weight is valid only when finite and strictly positive.
//! - A competition date always resolves to one calendar day.

use chrono::{DateTime, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a competition record.
pub type CompetitionId = String;
/// Stable identifier of a participant, unique within one competition.
pub type ParticipantId = String;
/// Stable identifier of a catch, unique within one participant.
pub type CatchId = String;

const COMPETITION_ID_PREFIX: &str = "comp_";
const PARTICIPANT_ID_PREFIX: &str = "p_";
const CATCH_ID_PREFIX: &str = "c_";

/// Validation failures raised at construction, mutation or reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field is missing or blank.
    EmptyField(&'static str),
    /// Date text does not resolve to a calendar date.
    InvalidDate(String),
    /// Weight is zero, negative or not a finite number.
    NonPositiveWeight(f64),
    /// Identifier already present in the owning collection.
    DuplicateId(String),
    /// Stored or imported record could not be reconstructed.
    MalformedRecord(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidDate(value) => write!(f, "invalid calendar date `{value}`"),
            Self::NonPositiveWeight(value) => {
                write!(f, "weight must be a positive number, got {value}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate id: {id}"),
            Self::MalformedRecord(message) => write!(f, "malformed record: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Errors raised by competition aggregate mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum CompetitionError {
    Validation(ValidationError),
    /// The competition was finalized; participants and catches are frozen.
    Finalized(CompetitionId),
    /// Catch logging targeted a participant that is not enrolled.
    ParticipantNotFound(ParticipantId),
}

impl Display for CompetitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Finalized(id) => write!(f, "competition {id} is finalized"),
            Self::ParticipantNotFound(id) => write!(f, "participant not found: {id}"),
        }
    }
}

impl Error for CompetitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Finalized(_) | Self::ParticipantNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for CompetitionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub(crate) fn new_competition_id() -> CompetitionId {
    prefixed_id(COMPETITION_ID_PREFIX)
}

pub(crate) fn new_participant_id() -> ParticipantId {
    prefixed_id(PARTICIPANT_ID_PREFIX)
}

pub(crate) fn new_catch_id() -> CatchId {
    prefixed_id(CATCH_ID_PREFIX)
}

fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

/// Returns the trimmed value, or `EmptyField` when nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_weight(weight: f64) -> Result<f64, ValidationError> {
    if is_valid_weight(weight) {
        Ok(weight)
    } else {
        Err(ValidationError::NonPositiveWeight(weight))
    }
}

pub(crate) fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Parses competition date text.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (reduced to their
/// calendar date).
pub fn parse_competition_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("date"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        is_valid_weight, new_catch_id, new_competition_id, new_participant_id,
        parse_competition_date, require_text, ValidationError,
    };
    use chrono::NaiveDate;

    #[test]
    fn generated_ids_carry_entity_prefix_and_differ() {
        let first = new_competition_id();
        assert!(first.starts_with("comp_"));
        assert_ne!(first, new_competition_id());
        assert!(new_participant_id().starts_with("p_"));
        assert!(new_catch_id().starts_with("c_"));
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("name", "  Ana ").unwrap(), "Ana");
        assert_eq!(
            require_text("name", " \t ").unwrap_err(),
            ValidationError::EmptyField("name")
        );
    }

    #[test]
    fn weight_rule_rejects_zero_negative_and_nan() {
        assert!(is_valid_weight(0.5));
        assert!(!is_valid_weight(0.0));
        assert!(!is_valid_weight(-5.0));
        assert!(!is_valid_weight(f64::NAN));
        assert!(!is_valid_weight(f64::INFINITY));
    }

    #[test]
    fn date_parser_accepts_plain_and_rfc3339_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(parse_competition_date("2024-05-10").unwrap(), expected);
        assert_eq!(
            parse_competition_date("2024-05-10T08:30:00.000Z").unwrap(),
            expected
        );
    }

    #[test]
    fn date_parser_rejects_impossible_dates() {
        assert!(matches!(
            parse_competition_date("2024-02-30"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_competition_date("not a date"),
            Err(ValidationError::InvalidDate(_))
        ));
    }
}
