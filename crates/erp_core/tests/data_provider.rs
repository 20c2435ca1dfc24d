use erp_core::model::business::FinanceKind;
use erp_core::{DataProvider, DemoFixture};

#[test]
fn bundled_provider_exposes_fixture_collections() {
    let fixture = DemoFixture::bundled().unwrap();
    let provider = DataProvider::bundled().unwrap();

    assert_eq!(provider.employees(), fixture.employees.as_slice());
    assert_eq!(provider.customers(), fixture.customers.as_slice());
    assert_eq!(provider.inventory(), fixture.inventory.as_slice());
    assert_eq!(provider.sales(), fixture.sales.as_slice());
    assert_eq!(provider.projects(), fixture.projects.as_slice());
    assert_eq!(provider.finance(), fixture.finance.as_slice());
    assert_eq!(provider.dashboard(), fixture.dashboard.as_ref());
}

#[test]
fn low_stock_items_are_at_or_below_reorder_level() {
    let provider = DataProvider::bundled().unwrap();
    let low = provider.low_stock_items();

    assert!(!low.is_empty());
    assert!(low.iter().all(|item| item.quantity <= item.reorder_level));
    let expected = provider
        .inventory()
        .iter()
        .filter(|item| item.quantity <= item.reorder_level)
        .count();
    assert_eq!(low.len(), expected);
}

#[test]
fn finance_totals_split_income_and_expenses() {
    let provider = DataProvider::bundled().unwrap();
    let totals = provider.finance_totals();

    let income: f64 = provider
        .finance()
        .iter()
        .filter(|record| record.kind == FinanceKind::Income)
        .map(|record| record.amount)
        .sum();
    let expenses: f64 = provider
        .finance()
        .iter()
        .filter(|record| record.kind == FinanceKind::Expense)
        .map(|record| record.amount)
        .sum();

    assert_eq!(totals.income, income);
    assert_eq!(totals.expenses, expenses);
    assert_eq!(totals.net(), income - expenses);
}

#[test]
fn report_data_carries_every_category() {
    let provider = DataProvider::bundled().unwrap();
    let report = provider.report_data("Snapshot", 42);

    assert_eq!(report.title, "Snapshot");
    assert_eq!(report.generated_at, 42);
    assert_eq!(report.inventory.len(), provider.inventory().len());
    assert_eq!(report.sales.len(), provider.sales().len());
    assert_eq!(report.finance.len(), provider.finance().len());
    assert_eq!(report.employees.len(), provider.employees().len());
    assert_eq!(report.projects.len(), provider.projects().len());
}

#[test]
fn fixture_file_can_replace_bundled_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.json");
    std::fs::write(
        &path,
        r#"{"customers": [{
            "id": "c9",
            "name": "Tiny Shop",
            "email": "hi@tiny.test",
            "company": "Tiny Shop",
            "totalOrders": 1,
            "totalSpent": 12.5,
            "status": "lead"
        }]}"#,
    )
    .unwrap();

    let provider = DataProvider::new(DemoFixture::from_path(&path).unwrap());
    assert_eq!(provider.customers().len(), 1);
    assert!(provider.employees().is_empty());
    assert!(provider.dashboard().is_none());
}

#[test]
fn missing_fixture_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DemoFixture::from_path(dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().starts_with("failed to read fixture"));
}
