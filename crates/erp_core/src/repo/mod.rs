//! Persisted key-value state.
//!
//! # Responsibility
//! - Define the storage contract stores use for their persisted blobs.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Values are written wholesale; there are no partial updates.
//! - Structured blobs go through the versioned envelope in `state_repo`.

pub mod state_repo;
