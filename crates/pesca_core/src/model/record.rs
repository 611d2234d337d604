//! Persisted record shape for competitions.
//!
//! # Responsibility
//! - Mirror the stored JSON document field-for-field.
//! - Keep wire naming (`nombre`, `capturas`, ...) out of the domain types.
//!
//! # Invariants
//! - Field names are stable; renaming one breaks previously stored records.
//! - Optional text and list fields default to empty when absent.
//! - `estado` defaults to the active state when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::competition::CompetitionState;

/// Stored form of one catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    pub id: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "tipoPez", default)]
    pub fish_type: String,
    /// Creation instant, RFC 3339.
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
}

/// Stored form of one participant with its catches in logging order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido", default)]
    pub family_name: String,
    #[serde(rename = "capturas", default)]
    pub catches: Vec<CatchRecord>,
}

/// Stored form of a whole competition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionRecord {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Calendar date text, written as `YYYY-MM-DD`.
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "estado", default)]
    pub state: CompetitionState,
    #[serde(rename = "participantes", default)]
    pub participants: Vec<ParticipantRecord>,
}
