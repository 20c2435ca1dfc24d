//! Core use-case services consumed by dashboard front ends.
//!
//! # Responsibility
//! - Own session and notification state as explicit store objects.
//! - Keep front ends decoupled from storage and fixture details.

pub mod data_service;
pub mod export_service;
pub mod notification_service;
pub mod session_service;
