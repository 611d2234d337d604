//! Static summary documents built from a competition.
//!
//! # Responsibility
//! - Collect the read-only views an export needs (info, listing, ranking,
//!   catches, statistics) into one owned value.
//! - Render that value as a plain-text document.
//!
//! # Invariants
//! - Report building never mutates the competition.

pub mod summary;
