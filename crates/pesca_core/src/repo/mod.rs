//! Persistence gateway contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save/delete contract for whole competition records.
//! - Isolate SQLite details from the service layer and the domain model.
//!
//! # Invariants
//! - A record is always stored and loaded as one complete tree.
//! - Read paths return semantic "absent" values (`None`/`false`) for missing
//!   ids and reject malformed stored records instead of masking them.

pub mod competition_repo;
