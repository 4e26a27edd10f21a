//! Point sequences for each chart type.
//!
//! Field renaming and derivation only; the numbers come from
//! [`crate::aggregate`].

use serde::{Deserialize, Serialize};

use crate::aggregate::MonthlyBucket;
use crate::constants::MONTHS_IN_YEAR;
use crate::format::MONTH_ABBREVIATIONS;
use crate::models::{CategoryTotal, YearlyComparisonEntry};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyBar {
    pub month: String,
    pub receitas: f64,
    pub despesas: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BalancePoint {
    pub month: String,
    pub saldo: f64,
}

pub fn pie_slices(totals: &[CategoryTotal]) -> Vec<PieSlice> {
    totals
        .iter()
        .map(|total| PieSlice {
            name: total.name.clone(),
            value: total.value,
            color: total.color.clone(),
        })
        .collect()
}

pub fn bar_series(buckets: &[MonthlyBucket]) -> Vec<MonthlyBar> {
    buckets
        .iter()
        .map(|bucket| MonthlyBar {
            month: bucket.month.clone(),
            receitas: bucket.income,
            despesas: bucket.expenses,
        })
        .collect()
}

pub fn balance_series(buckets: &[MonthlyBucket]) -> Vec<BalancePoint> {
    buckets
        .iter()
        .map(|bucket| BalancePoint {
            month: bucket.month.clone(),
            saldo: bucket.income - bucket.expenses,
        })
        .collect()
}

/// Twelve buckets from the server's yearly comparison. Entries are placed
/// by position; a short response is zero-filled and extra entries ignored.
pub fn buckets_from_comparison(entries: &[YearlyComparisonEntry]) -> Vec<MonthlyBucket> {
    (0..MONTHS_IN_YEAR)
        .map(|index| {
            let entry = entries.get(index);
            MonthlyBucket {
                month: MONTH_ABBREVIATIONS[index].to_string(),
                income: entry.map(|e| e.incomes).unwrap_or(0.0),
                expenses: entry.map(|e| e.expenses).unwrap_or(0.0),
            }
        })
        .collect()
}
