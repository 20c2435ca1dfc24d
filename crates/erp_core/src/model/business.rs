//! Read-only business records loaded from the demo fixture.
//!
//! Monetary values are plain `f64` amounts in the company currency; the
//! fixture carries no currency codes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Inactive,
}

impl EmployeeStatus {
    /// Wire name, as written in the fixture and in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub status: EmployeeStatus,
    /// ISO-8601 calendar date.
    pub hire_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Lead,
}

impl CustomerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Lead => "lead",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub total_orders: u32,
    pub total_spent: f64,
    pub status: CustomerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub reorder_level: u32,
    pub supplier: String,
}

impl InventoryItem {
    pub fn stock_value(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    /// At or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub customer: String,
    pub product: String,
    pub quantity: u32,
    pub amount: f64,
    /// ISO-8601 calendar date.
    pub date: String,
    pub status: SaleStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client: String,
    pub manager: String,
    pub status: ProjectStatus,
    /// Completion percentage, `0..=100`.
    pub progress: u8,
    pub budget: f64,
    pub spent: f64,
    /// ISO-8601 calendar date.
    pub deadline: String,
}

impl Project {
    pub fn is_active(&self) -> bool {
        matches!(self.status, ProjectStatus::Planning | ProjectStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    Income,
    Expense,
}

impl FinanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: String,
    /// ISO-8601 calendar date.
    pub date: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    /// Always positive; the direction comes from `kind`.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetric {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
}

/// Pre-aggregated headline numbers for the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub active_employees: u32,
    pub active_projects: u32,
    pub pending_orders: u32,
    pub monthly: Vec<MonthlyMetric>,
}

impl DashboardStats {
    pub fn net_profit(&self) -> f64 {
        self.total_revenue - self.total_expenses
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CustomerStatus, EmployeeStatus, FinanceKind, InventoryItem, Project, ProjectStatus,
        SaleStatus,
    };
    use serde::Serialize;

    fn wire_name<T: Serialize>(value: T) -> String {
        serde_json::to_value(value)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    fn item(quantity: u32, reorder_level: u32) -> InventoryItem {
        InventoryItem {
            id: "inv-1".to_string(),
            name: "Desk".to_string(),
            sku: "DSK-01".to_string(),
            category: "Furniture".to_string(),
            quantity,
            unit_price: 120.5,
            reorder_level,
            supplier: "Acme".to_string(),
        }
    }

    #[test]
    fn stock_value_and_low_stock_threshold() {
        assert_eq!(item(4, 10).stock_value(), 482.0);
        assert!(item(10, 10).is_low_stock());
        assert!(!item(11, 10).is_low_stock());
    }

    #[test]
    fn only_planning_and_in_progress_projects_are_active() {
        let mut project = Project {
            id: "p1".to_string(),
            name: "Rollout".to_string(),
            client: "Globex".to_string(),
            manager: "Manager User".to_string(),
            status: ProjectStatus::InProgress,
            progress: 40,
            budget: 1000.0,
            spent: 400.0,
            deadline: "2026-12-01".to_string(),
        };
        assert!(project.is_active());
        project.status = ProjectStatus::OnHold;
        assert!(!project.is_active());
    }

    #[test]
    fn status_names_match_fixture_encoding() {
        for status in [EmployeeStatus::Active, EmployeeStatus::OnLeave, EmployeeStatus::Inactive] {
            assert_eq!(status.as_str(), wire_name(status));
        }
        for status in [CustomerStatus::Active, CustomerStatus::Inactive, CustomerStatus::Lead] {
            assert_eq!(status.as_str(), wire_name(status));
        }
        for status in [SaleStatus::Pending, SaleStatus::Completed, SaleStatus::Cancelled] {
            assert_eq!(status.as_str(), wire_name(status));
        }
        for status in [
            ProjectStatus::Planning,
            ProjectStatus::InProgress,
            ProjectStatus::OnHold,
            ProjectStatus::Completed,
        ] {
            assert_eq!(status.as_str(), wire_name(status));
        }
        for kind in [FinanceKind::Income, FinanceKind::Expense] {
            assert_eq!(kind.as_str(), wire_name(kind));
        }
        assert_eq!(EmployeeStatus::OnLeave.as_str(), "on_leave");
        assert_eq!(ProjectStatus::InProgress.as_str(), "in_progress");
    }
}
