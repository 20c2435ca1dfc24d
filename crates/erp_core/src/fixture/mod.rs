//! Static demo dataset standing in for a real ERP backend.
//!
//! # Responsibility
//! - Parse the bundled JSON fixture compiled into the crate.
//! - Allow hosts to substitute their own fixture file with the same schema.
//!
//! # Invariants
//! - A fixture is parsed once and never written back.
//! - Every collection defaults to empty when absent from the JSON.

use crate::model::business::{
    Customer, DashboardStats, Employee, FinanceRecord, InventoryItem, Project, Sale,
};
use crate::model::notification::Notification;
use log::{error, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const BUNDLED_FIXTURE_JSON: &str = include_str!("demo_data.json");

static BUNDLED_FIXTURE: OnceCell<DemoFixture> = OnceCell::new();

pub type FixtureResult<T> = Result<T, FixtureError>;

#[derive(Debug)]
pub enum FixtureError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for FixtureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read fixture: {err}"),
            Self::Parse(err) => write!(f, "failed to parse fixture: {err}"),
        }
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FixtureError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Whole demo dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemoFixture {
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<Sale>,
    pub projects: Vec<Project>,
    pub finance: Vec<FinanceRecord>,
    pub dashboard: Option<DashboardStats>,
    pub notifications: Vec<Notification>,
}

impl DemoFixture {
    /// Returns the fixture compiled into this crate, parsed on first use.
    pub fn bundled() -> FixtureResult<&'static DemoFixture> {
        BUNDLED_FIXTURE.get_or_try_init(|| {
            let fixture = Self::from_json_str(BUNDLED_FIXTURE_JSON)?;
            info!(
                "event=fixture_load module=fixture status=ok source=bundled employees={} inventory={} sales={} notifications={}",
                fixture.employees.len(),
                fixture.inventory.len(),
                fixture.sales.len(),
                fixture.notifications.len()
            );
            Ok(fixture)
        })
    }

    pub fn from_json_str(json: &str) -> FixtureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a fixture file with the same schema as the bundled one.
    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            error!("event=fixture_load module=fixture status=error source=file error={err}");
            err
        })?;
        let fixture = Self::from_json_str(&text)?;
        info!("event=fixture_load module=fixture status=ok source=file");
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::DemoFixture;

    #[test]
    fn bundled_fixture_parses_every_collection() {
        let fixture = DemoFixture::bundled().unwrap();
        assert!(!fixture.employees.is_empty());
        assert!(!fixture.customers.is_empty());
        assert!(!fixture.inventory.is_empty());
        assert!(!fixture.sales.is_empty());
        assert!(!fixture.projects.is_empty());
        assert!(!fixture.finance.is_empty());
        assert!(fixture.dashboard.is_some());
        assert!(fixture.notifications.iter().any(|n| !n.read));
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let fixture = DemoFixture::from_json_str(r#"{"employees": []}"#).unwrap();
        assert!(fixture.sales.is_empty());
        assert!(fixture.dashboard.is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = DemoFixture::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse fixture"));
    }
}
