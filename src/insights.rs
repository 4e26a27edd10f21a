//! Natural-language insights derived from aggregated totals.
//!
//! Rules run in a fixed priority order and each appends at most one
//! observation (the spending ratio rule may add a follow-up warning or
//! praise). Insights carry a [`InsightKind`] so presentation can pick an
//! icon or colour without inspecting the sentence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{percent_change, percent_of, top_category};
use crate::constants::{DASHBOARD_INSIGHT_CAP, SAVINGS_PRAISE_RATIO};
use crate::format::{format_currency, format_percent};
use crate::models::CategoryTotal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// No income registered yet
    Onboarding,
    /// Share of income already spent
    SpendingRatio,
    /// Expenses exceed income
    OverspendingWarning,
    /// Expenses below 70% of income
    SavingsPraise,
    /// Highest-spending category
    TopCategory,
    /// Money kept in piggy banks
    SavingsTotal,
    /// Month-over-month growth in spending
    SpendingIncrease,
    /// Month-over-month drop in spending
    SpendingDecrease,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Onboarding => "onboarding",
            InsightKind::SpendingRatio => "spending_ratio",
            InsightKind::OverspendingWarning => "overspending_warning",
            InsightKind::SavingsPraise => "savings_praise",
            InsightKind::TopCategory => "top_category",
            InsightKind::SavingsTotal => "savings_total",
            InsightKind::SpendingIncrease => "spending_increase",
            InsightKind::SpendingDecrease => "spending_decrease",
        }
    }

    pub fn tone(&self) -> InsightTone {
        match self {
            InsightKind::OverspendingWarning | InsightKind::SpendingIncrease => InsightTone::Alert,
            InsightKind::SavingsPraise | InsightKind::SpendingDecrease => InsightTone::Positive,
            InsightKind::SpendingRatio | InsightKind::TopCategory => InsightTone::Trend,
            InsightKind::Onboarding | InsightKind::SavingsTotal => InsightTone::Tip,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation family of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTone {
    Alert,
    Positive,
    Trend,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

impl Insight {
    fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn tone(&self) -> InsightTone {
        self.kind.tone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightVariant {
    /// Capped at four entries, no month-over-month comparison
    Dashboard,
    /// Uncapped, adds the month-over-month comparison
    Reports,
}

/// Aggregated figures for one period.
#[derive(Debug, Clone)]
pub struct InsightInput<'a> {
    pub variant: InsightVariant,
    pub income_records: usize,
    pub total_income: f64,
    pub total_expenses: f64,
    pub category_totals: &'a [CategoryTotal],
    pub total_savings: f64,
    pub previous_month_expenses: Option<f64>,
    /// Month name for the ratio sentence; `None` reads "este mês".
    pub period_label: Option<&'a str>,
}

pub fn generate_insights(input: &InsightInput<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    if input.income_records == 0 {
        insights.push(Insight::new(
            InsightKind::Onboarding,
            "Cadastre suas receitas para começar a receber insights personalizados.",
        ));
    }

    if input.total_expenses > 0.0 && input.total_income > 0.0 {
        if let Some(ratio) = percent_of(input.total_expenses, input.total_income) {
            let period = match input.period_label {
                Some(label) => format!("em {}", label),
                None => "este mês".to_string(),
            };
            insights.push(Insight::new(
                InsightKind::SpendingRatio,
                format!(
                    "Você gastou {}% da sua renda {}.",
                    format_percent(ratio),
                    period
                ),
            ));
        }

        if input.total_expenses > input.total_income {
            insights.push(Insight::new(
                InsightKind::OverspendingWarning,
                "Atenção: seus gastos estão acima da sua renda mensal. Considere revisar suas despesas.",
            ));
        } else if input.total_expenses < input.total_income * SAVINGS_PRAISE_RATIO {
            insights.push(Insight::new(
                InsightKind::SavingsPraise,
                "Parabéns! Você está economizando mais de 30% da sua renda.",
            ));
        }
    }

    if let Some(top) = top_category(input.category_totals) {
        if let Some(share) = percent_of(top.value, input.total_income).filter(|s| *s > 0.0) {
            insights.push(Insight::new(
                InsightKind::TopCategory,
                format!(
                    "A categoria \"{}\" representa {}% da sua renda.",
                    top.name,
                    format_percent(share)
                ),
            ));
        }
    }

    if input.total_savings > 0.0 {
        insights.push(Insight::new(
            InsightKind::SavingsTotal,
            format!(
                "Você tem {} guardados nos seus porquinhos.",
                format_currency(input.total_savings)
            ),
        ));
    }

    if input.variant == InsightVariant::Reports {
        let change = input
            .previous_month_expenses
            .and_then(|previous| percent_change(previous, input.total_expenses));
        match change {
            Some(change) if change > 0.0 => insights.push(Insight::new(
                InsightKind::SpendingIncrease,
                format!(
                    "Seus gastos aumentaram {}% em relação ao mês anterior.",
                    format_percent(change)
                ),
            )),
            Some(change) if change < 0.0 => insights.push(Insight::new(
                InsightKind::SpendingDecrease,
                format!(
                    "Parabéns! Você reduziu seus gastos em {}% em relação ao mês anterior.",
                    format_percent(change.abs())
                ),
            )),
            _ => {}
        }
    }

    if input.variant == InsightVariant::Dashboard {
        insights.truncate(DASHBOARD_INSIGHT_CAP);
    }

    insights
}
