use cofrinho::aggregate::{MonthlyBucket, monthly_buckets};
use cofrinho::charts::*;
use cofrinho::format::*;
use cofrinho::models::{CategoryTotal, Recurrence, YearlyComparisonEntry};

#[test]
fn balance_is_income_minus_expenses() {
    let buckets = vec![
        MonthlyBucket {
            month: "Jan".to_string(),
            income: 3000.0,
            expenses: 1200.0,
        },
        MonthlyBucket {
            month: "Fev".to_string(),
            income: 3000.0,
            expenses: 3500.0,
        },
    ];

    let points = balance_series(&buckets);
    assert_eq!(points[0].saldo, 1800.0);
    assert_eq!(points[1].saldo, -500.0);
    assert_eq!(points[1].month, "Fev");
}

#[test]
fn chart_points_keep_wire_field_names() {
    let bars = bar_series(&monthly_buckets(&[], 2024, 100.0));
    let json = serde_json::to_value(&bars[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"month": "Jan", "receitas": 100.0, "despesas": 0.0})
    );

    let line = balance_series(&monthly_buckets(&[], 2024, 100.0));
    let json = serde_json::to_value(&line[11]).unwrap();
    assert_eq!(json, serde_json::json!({"month": "Dez", "saldo": 100.0}));
}

#[test]
fn pie_slices_copy_name_value_and_color() {
    let totals = vec![CategoryTotal {
        name: "Food".to_string(),
        value: 80.0,
        color: "#f00".to_string(),
    }];
    let slices = pie_slices(&totals);
    assert_eq!(
        slices,
        vec![PieSlice {
            name: "Food".to_string(),
            value: 80.0,
            color: "#f00".to_string(),
        }]
    );
}

#[test]
fn comparison_buckets_are_zero_filled() {
    let entries = vec![
        YearlyComparisonEntry {
            month: 1,
            incomes: 5000.0,
            expenses: 1000.0,
        },
        YearlyComparisonEntry {
            month: 2,
            incomes: 5000.0,
            expenses: 2500.0,
        },
    ];

    let buckets = buckets_from_comparison(&entries);
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[1].expenses, 2500.0);
    assert_eq!(buckets[5].income, 0.0);
    assert_eq!(buckets[11].month, "Dez");
}

#[test]
fn comparison_entries_tolerate_missing_fields() {
    let entries: Vec<YearlyComparisonEntry> =
        serde_json::from_str(r#"[{"month": 1, "expenses": 10.5}, {"month": 2}]"#).unwrap();
    let buckets = buckets_from_comparison(&entries);
    assert_eq!(buckets[0].income, 0.0);
    assert_eq!(buckets[0].expenses, 10.5);
    assert_eq!(buckets[1].expenses, 0.0);
}

#[test]
fn currency_uses_brazilian_separators() {
    assert_eq!(format_currency(1234.56), "R$ 1.234,56");
    assert_eq!(format_currency(0.0), "R$ 0,00");
    assert_eq!(format_currency(5.5), "R$ 5,50");
    assert_eq!(format_currency(1_000_000.0), "R$ 1.000.000,00");
    assert_eq!(format_currency(-12.0), "-R$ 12,00");
    assert_eq!(format_currency(f64::NAN), "R$ 0,00");
}

#[test]
fn percent_has_one_decimal() {
    assert_eq!(format_percent(80.0), "80.0");
    assert_eq!(format_percent(33.333), "33.3");
    assert_eq!(format_percent(-0.01), "0.0");
}

#[test]
fn month_and_recurrence_labels() {
    assert_eq!(month_name(0), Some("Janeiro"));
    assert_eq!(month_name(2), Some("Março"));
    assert_eq!(month_name(11), Some("Dezembro"));
    assert_eq!(month_name(12), None);
    assert_eq!(MONTH_ABBREVIATIONS[8], "Set");
    assert_eq!(recurrence_label(Recurrence::Monthly), "Mensal");
    assert_eq!(recurrence_label(Recurrence::Weekly), "Semanal");
    assert_eq!(recurrence_label(Recurrence::Yearly), "Anual");
}
