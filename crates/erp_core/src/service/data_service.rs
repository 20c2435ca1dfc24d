//! Read-only domain data provider.
//!
//! # Responsibility
//! - Expose fixture collections to dashboard pages.
//! - Derive the small aggregates pages and reports need.
//!
//! # Invariants
//! - There is no mutation path back into the fixture.

use crate::fixture::{DemoFixture, FixtureResult};
use crate::model::business::{
    Customer, DashboardStats, Employee, FinanceKind, FinanceRecord, InventoryItem, Project, Sale,
};
use crate::model::notification::Notification;
use crate::service::export_service::ReportData;

/// Income/expense totals over the finance ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinanceTotals {
    pub income: f64,
    pub expenses: f64,
}

impl FinanceTotals {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FinanceRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut totals, record| {
                match record.kind {
                    FinanceKind::Income => totals.income += record.amount,
                    FinanceKind::Expense => totals.expenses += record.amount,
                }
                totals
            })
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Read-only view over one [`DemoFixture`].
#[derive(Debug, Clone)]
pub struct DataProvider {
    fixture: DemoFixture,
}

impl DataProvider {
    pub fn new(fixture: DemoFixture) -> Self {
        Self { fixture }
    }

    /// Provider over the fixture compiled into the crate.
    pub fn bundled() -> FixtureResult<Self> {
        Ok(Self::new(DemoFixture::bundled()?.clone()))
    }

    pub fn employees(&self) -> &[Employee] {
        &self.fixture.employees
    }

    pub fn customers(&self) -> &[Customer] {
        &self.fixture.customers
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.fixture.inventory
    }

    pub fn sales(&self) -> &[Sale] {
        &self.fixture.sales
    }

    pub fn projects(&self) -> &[Project] {
        &self.fixture.projects
    }

    pub fn finance(&self) -> &[FinanceRecord] {
        &self.fixture.finance
    }

    pub fn dashboard(&self) -> Option<&DashboardStats> {
        self.fixture.dashboard.as_ref()
    }

    /// Notification records in fixture order.
    pub fn notifications(&self) -> &[Notification] {
        &self.fixture.notifications
    }

    pub fn low_stock_items(&self) -> Vec<&InventoryItem> {
        self.fixture
            .inventory
            .iter()
            .filter(|item| item.is_low_stock())
            .collect()
    }

    pub fn finance_totals(&self) -> FinanceTotals {
        FinanceTotals::from_records(&self.fixture.finance)
    }

    /// Assembles every exportable category into one report.
    pub fn report_data(&self, title: impl Into<String>, generated_at: i64) -> ReportData {
        ReportData {
            title: title.into(),
            generated_at,
            inventory: self.fixture.inventory.clone(),
            sales: self.fixture.sales.clone(),
            finance: self.fixture.finance.clone(),
            employees: self.fixture.employees.clone(),
            projects: self.fixture.projects.clone(),
        }
    }
}
