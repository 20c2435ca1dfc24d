//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Collect the knobs a host application (CLI or UI shell) passes to core.
//! - Provide defaults that match the demo dashboard behavior.

use crate::logging::{default_log_level, LogLevel};
use std::path::PathBuf;
use std::time::Duration;

/// Database file name used when the host does not pick one.
pub const DEFAULT_DB_FILE_NAME: &str = "erp_dashboard.sqlite3";

/// Artificial delay applied to login/signup/onboarding calls.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

/// Host-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing persisted key-value state.
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub simulated_latency: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

impl CoreConfig {
    /// Derives the session store settings.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            simulated_latency: self.simulated_latency,
        }
    }
}

/// Settings consumed by [`crate::service::session_service::SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub simulated_latency: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

impl SessionConfig {
    /// Configuration without artificial delay, for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
        }
    }
}
