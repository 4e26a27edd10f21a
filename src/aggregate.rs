//! Pure aggregations over fetched record lists.
//!
//! Nothing here touches the network or mutates its inputs. Both the client
//! view models and the server's report endpoints go through these functions,
//! so the two sides agree on every total.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::{Date, Month, macros::format_description};

use crate::constants::MONTHS_IN_YEAR;
use crate::format::MONTH_ABBREVIATIONS;
use crate::models::{CategoryTotal, Expense, ExpenseCategory};

/// One calendar month of the income vs expenses bar chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub month: String,
    #[serde(rename = "receitas")]
    pub income: f64,
    #[serde(rename = "despesas")]
    pub expenses: f64,
}

/// Parses the calendar date at the start of an ISO string (`YYYY-MM-DD`,
/// optionally followed by a time part).
pub fn parse_iso_date(value: &str) -> Option<Date> {
    let date_part = value.trim().get(..10)?;
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

/// Sum of a numeric field over a list. Empty lists yield `0.0`.
pub fn total_of<T>(records: &[T], amount: impl Fn(&T) -> f64) -> f64 {
    records
        .iter()
        .fold(0.0, |total, record| total + amount(record))
}

/// Zero-based `(year, month)` of the date written in an expense.
pub fn expense_year_month(expense: &Expense) -> Option<(i32, u8)> {
    parse_iso_date(&expense.date).map(|d| (d.year(), u8::from(d.month()) - 1))
}

/// Expenses dated within `month` (0 = January) of `year`.
pub fn filter_by_month(expenses: &[Expense], year: i32, month: u8) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| expense_year_month(e) == Some((year, month)))
        .cloned()
        .collect()
}

/// Per-category totals in category order, zero entries included.
///
/// Expenses whose `category_id` matches no category are left out.
pub fn category_totals(expenses: &[Expense], categories: &[ExpenseCategory]) -> Vec<CategoryTotal> {
    categories
        .iter()
        .map(|category| CategoryTotal {
            name: category.name.clone(),
            value: expenses
                .iter()
                .filter(|e| e.category_id == category.id)
                .fold(0.0, |total, e| total + e.amount),
            color: category.color.clone(),
        })
        .collect()
}

/// Chart-ready per-category totals: like [`category_totals`] with entries
/// of value <= 0 dropped.
pub fn sum_by_category(expenses: &[Expense], categories: &[ExpenseCategory]) -> Vec<CategoryTotal> {
    category_totals(expenses, categories)
        .into_iter()
        .filter(|total| total.value > 0.0)
        .collect()
}

/// Twelve buckets, January to December, of the expenses dated in `year`.
/// Every bucket carries the same `monthly_income`.
pub fn monthly_buckets(expenses: &[Expense], year: i32, monthly_income: f64) -> Vec<MonthlyBucket> {
    let mut totals = [0.0_f64; MONTHS_IN_YEAR];
    for expense in expenses {
        if let Some((expense_year, month)) = expense_year_month(expense) {
            if expense_year == year {
                totals[month as usize] += expense.amount;
            }
        }
    }

    MONTH_ABBREVIATIONS
        .iter()
        .zip(totals)
        .map(|(label, expenses)| MonthlyBucket {
            month: label.to_string(),
            income: monthly_income,
            expenses,
        })
        .collect()
}

/// Sorted by value, highest first, truncated to `n`. Equal values keep
/// their input order.
pub fn top_categories(totals: &[CategoryTotal], n: usize) -> Vec<CategoryTotal> {
    let mut ranked = totals.to_vec();
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// The highest-spending category; the first one wins a tie.
pub fn top_category(totals: &[CategoryTotal]) -> Option<&CategoryTotal> {
    totals.iter().fold(None, |best: Option<&CategoryTotal>, candidate| match best {
        Some(current) if candidate.value <= current.value => Some(current),
        _ => Some(candidate),
    })
}

/// `part` as a percentage of `whole`, or `None` when `whole` is not a
/// positive finite number.
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    if !whole.is_finite() || whole <= 0.0 || !part.is_finite() {
        return None;
    }
    Some(part / whole * 100.0)
}

/// Percent change from `previous` to `current`, `None` unless `previous` > 0.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    percent_of(current - previous, previous)
}

/// Amount rounded to whole cents.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// First and last ISO day of `month` (0 = January) in `year`.
pub fn month_range(year: i32, month: u8) -> Option<(String, String)> {
    let month = Month::try_from(month.checked_add(1)?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let next_first = if month == Month::December {
        Date::from_calendar_date(year + 1, Month::January, 1).ok()?
    } else {
        Date::from_calendar_date(year, month.next(), 1).ok()?
    };
    let last = next_first.previous_day()?;
    Some((first.to_string(), last.to_string()))
}
