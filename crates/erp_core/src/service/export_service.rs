//! Report export to CSV and HTML text.
//!
//! # Responsibility
//! - Turn [`ReportData`] into labeled sections plus a summary block.
//! - Render the sections as CSV or as a standalone HTML document.
//!
//! # Invariants
//! - Section order is inventory, sales, finance, employees, projects,
//!   summary. Empty categories are skipped; the summary is always present.
//! - Each section is a title line, one column header row and one row per
//!   record. Sections are separated by a single blank line.
//! - Files are written once, after the whole text has been assembled.

use crate::model::business::{Employee, FinanceRecord, InventoryItem, Project, Sale, SaleStatus};
use crate::service::data_service::FinanceTotals;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const INVENTORY_SECTION: &str = "INVENTORY DATA";
pub const SALES_SECTION: &str = "SALES DATA";
pub const FINANCE_SECTION: &str = "FINANCE DATA";
pub const EMPLOYEE_SECTION: &str = "EMPLOYEE DATA";
pub const PROJECT_SECTION: &str = "PROJECT DATA";
pub const SUMMARY_SECTION: &str = "SUMMARY";

pub type ExportResult<T> = Result<T, ExportError>;

/// Single error type for every export failure.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Encoding(std::string::FromUtf8Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "export failed: {err}"),
            Self::Io(err) => write!(f, "export failed: {err}"),
            Self::Encoding(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encoding(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        Self::Encoding(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

/// Input of one export run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub title: String,
    /// Unix epoch milliseconds.
    pub generated_at: i64,
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<Sale>,
    pub finance: Vec<FinanceRecord>,
    pub employees: Vec<Employee>,
    pub projects: Vec<Project>,
}

/// Headline numbers printed in the summary block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub inventory_items: usize,
    pub inventory_value: f64,
    pub low_stock_items: usize,
    pub sales_orders: usize,
    /// Sum over non-cancelled sales.
    pub sales_revenue: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub employees: usize,
    pub active_projects: usize,
}

impl ReportSummary {
    pub fn from_report(data: &ReportData) -> Self {
        let finance = FinanceTotals::from_records(&data.finance);
        Self {
            inventory_items: data.inventory.len(),
            inventory_value: data.inventory.iter().map(InventoryItem::stock_value).sum(),
            low_stock_items: data.inventory.iter().filter(|i| i.is_low_stock()).count(),
            sales_orders: data.sales.len(),
            sales_revenue: data
                .sales
                .iter()
                .filter(|sale| sale.status != SaleStatus::Cancelled)
                .map(|sale| sale.amount)
                .sum(),
            total_income: finance.income,
            total_expenses: finance.expenses,
            employees: data.employees.len(),
            active_projects: data.projects.iter().filter(|p| p.is_active()).count(),
        }
    }

    pub fn net_profit(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

struct Section {
    title: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

/// Renders `data` in the requested format.
pub fn render(data: &ReportData, format: ExportFormat) -> ExportResult<String> {
    match format {
        ExportFormat::Csv => export_csv(data),
        ExportFormat::Html => Ok(export_html(data)),
    }
}

/// Renders the report as sectioned CSV.
pub fn export_csv(data: &ReportData) -> ExportResult<String> {
    let mut out = String::new();
    for section in build_sections(data) {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record([section.title])?;
        writer.write_record(section.headers)?;
        for row in &section.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&String::from_utf8(bytes)?);
    }
    Ok(out)
}

/// Renders the report as a standalone HTML document.
pub fn export_html(data: &ReportData) -> String {
    let title = escape_html(&data.title);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(
        "<style>\nbody{font-family:sans-serif;margin:24px;}\n\
         table{border-collapse:collapse;width:100%;margin-bottom:24px;}\n\
         th,td{border:1px solid #ddd;padding:6px 8px;text-align:left;}\n\
         th{background:#f3f4f6;}\n</style>\n</head>\n<body>\n",
    );
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p class=\"generated\">Generated: {}</p>\n",
        escape_html(&format_timestamp(data.generated_at))
    ));

    for section in build_sections(data) {
        html.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<table>\n<thead><tr>",
            escape_html(section.title)
        ));
        for header in section.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &section.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Renders and writes the report to `path` in one write.
pub fn write_report(
    path: impl AsRef<Path>,
    format: ExportFormat,
    data: &ReportData,
) -> ExportResult<()> {
    let path = path.as_ref();
    let text = render(data, format)?;
    match std::fs::write(path, text.as_bytes()) {
        Ok(()) => {
            info!(
                "event=report_export module=export status=ok format={} bytes={}",
                format.file_extension(),
                text.len()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=report_export module=export status=error format={} error={err}",
                format.file_extension()
            );
            Err(err.into())
        }
    }
}

/// `<slug>-<yyyy-mm-dd>.<ext>` for a report name and timestamp.
pub fn default_file_name(report_name: &str, format: ExportFormat, generated_at: i64) -> String {
    let slug = report_name
        .trim()
        .to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "report".to_string() } else { slug };
    let date = DateTime::<Utc>::from_timestamp_millis(generated_at)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    format!("{slug}-{date}.{}", format.file_extension())
}

fn build_sections(data: &ReportData) -> Vec<Section> {
    let mut sections = Vec::new();

    if !data.inventory.is_empty() {
        sections.push(Section {
            title: INVENTORY_SECTION,
            headers: &[
                "ID", "Name", "SKU", "Category", "Quantity", "Unit Price", "Reorder Level",
                "Supplier", "Stock Value",
            ],
            rows: data
                .inventory
                .iter()
                .map(|item| {
                    vec![
                        item.id.clone(),
                        item.name.clone(),
                        item.sku.clone(),
                        item.category.clone(),
                        item.quantity.to_string(),
                        money(item.unit_price),
                        item.reorder_level.to_string(),
                        item.supplier.clone(),
                        money(item.stock_value()),
                    ]
                })
                .collect(),
        });
    }

    if !data.sales.is_empty() {
        sections.push(Section {
            title: SALES_SECTION,
            headers: &["ID", "Customer", "Product", "Quantity", "Amount", "Date", "Status"],
            rows: data
                .sales
                .iter()
                .map(|sale| {
                    vec![
                        sale.id.clone(),
                        sale.customer.clone(),
                        sale.product.clone(),
                        sale.quantity.to_string(),
                        money(sale.amount),
                        sale.date.clone(),
                        sale.status.as_str().to_string(),
                    ]
                })
                .collect(),
        });
    }

    if !data.finance.is_empty() {
        sections.push(Section {
            title: FINANCE_SECTION,
            headers: &["ID", "Date", "Description", "Category", "Type", "Amount"],
            rows: data
                .finance
                .iter()
                .map(|record| {
                    vec![
                        record.id.clone(),
                        record.date.clone(),
                        record.description.clone(),
                        record.category.clone(),
                        record.kind.as_str().to_string(),
                        money(record.amount),
                    ]
                })
                .collect(),
        });
    }

    if !data.employees.is_empty() {
        sections.push(Section {
            title: EMPLOYEE_SECTION,
            headers: &[
                "ID", "Name", "Email", "Department", "Position", "Salary", "Status", "Hire Date",
            ],
            rows: data
                .employees
                .iter()
                .map(|employee| {
                    vec![
                        employee.id.clone(),
                        employee.name.clone(),
                        employee.email.clone(),
                        employee.department.clone(),
                        employee.position.clone(),
                        money(employee.salary),
                        employee.status.as_str().to_string(),
                        employee.hire_date.clone(),
                    ]
                })
                .collect(),
        });
    }

    if !data.projects.is_empty() {
        sections.push(Section {
            title: PROJECT_SECTION,
            headers: &[
                "ID", "Name", "Client", "Manager", "Status", "Progress", "Budget", "Spent",
                "Deadline",
            ],
            rows: data
                .projects
                .iter()
                .map(|project| {
                    vec![
                        project.id.clone(),
                        project.name.clone(),
                        project.client.clone(),
                        project.manager.clone(),
                        project.status.as_str().to_string(),
                        format!("{}%", project.progress),
                        money(project.budget),
                        money(project.spent),
                        project.deadline.clone(),
                    ]
                })
                .collect(),
        });
    }

    let summary = ReportSummary::from_report(data);
    sections.push(Section {
        title: SUMMARY_SECTION,
        headers: &["Metric", "Value"],
        rows: [
            ("Report", data.title.clone()),
            ("Generated At", format_timestamp(data.generated_at)),
            ("Inventory Items", summary.inventory_items.to_string()),
            ("Inventory Value", money(summary.inventory_value)),
            ("Low Stock Items", summary.low_stock_items.to_string()),
            ("Sales Orders", summary.sales_orders.to_string()),
            ("Sales Revenue", money(summary.sales_revenue)),
            ("Total Income", money(summary.total_income)),
            ("Total Expenses", money(summary.total_expenses)),
            ("Net Profit", money(summary.net_profit())),
            ("Employees", summary.employees.to_string()),
            ("Active Projects", summary.active_projects.to_string()),
        ]
        .into_iter()
        .map(|(metric, value)| vec![metric.to_string(), value])
        .collect(),
    });

    sections
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{default_file_name, escape_html, format_timestamp, ExportFormat};

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn default_file_name_slugs_name_and_dates_timestamp() {
        // 2026-10-16T00:00:00Z
        let ts = 1_792_108_800_000;
        assert_eq!(
            default_file_name("  Monthly ERP Report! ", ExportFormat::Csv, ts),
            "monthly-erp-report-2026-10-16.csv"
        );
        assert_eq!(
            default_file_name("???", ExportFormat::Html, ts),
            "report-2026-10-16.html"
        );
    }

    #[test]
    fn format_timestamp_renders_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }
}
