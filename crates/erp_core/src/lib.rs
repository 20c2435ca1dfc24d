//! Core state and data services for the ERP demo dashboard.
//! Front ends own the stores; nothing in this crate is a global singleton
//! apart from the logger and the parsed bundled fixture.

pub mod config;
pub mod db;
pub mod fixture;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CoreConfig, SessionConfig};
pub use fixture::{DemoFixture, FixtureError};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::notification::{Notification, NotificationId, NotificationType};
pub use model::session::{Role, Session, SignupProfile};
pub use repo::state_repo::{
    RepoError, RepoResult, SqliteStateRepository, StateKey, StateRepository,
};
pub use service::data_service::{DataProvider, FinanceTotals};
pub use service::export_service::{
    export_csv, export_html, write_report, ExportError, ExportFormat, ReportData, ReportSummary,
};
pub use service::notification_service::{NotificationError, NotificationSource, NotificationStore};
pub use service::session_service::{SessionError, SessionResult, SessionStore};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
