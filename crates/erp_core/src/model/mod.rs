//! Domain model for the ERP dashboard core.
//!
//! # Responsibility
//! - Define the session, notification and business record shapes shared by
//!   the fixture, the stores and the exporter.
//! - Keep serde names aligned with the camelCase fixture schema.
//!
//! # Invariants
//! - Business records are read-only once loaded.
//! - `Notification::read` only ever moves from `false` to `true`.

pub mod business;
pub mod notification;
pub mod session;
