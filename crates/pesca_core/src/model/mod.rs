//! Tournament domain model.
//!
//! # Responsibility
//! - Define the Competition -> Participant -> Catch ownership tree.
//! - Own ranking/statistics computation and lifecycle rules.
//!
//! # Invariants
//! - A competition exclusively owns its participants; a participant
//!   exclusively owns its catches.
//! - Serialization is a deep, whole-tree copy in the stored record shape.

pub mod catch;
pub mod competition;
pub mod participant;
pub mod record;
pub mod validation;
