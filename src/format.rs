//! pt-BR presentation helpers shared by insights, views and the CLI.

use crate::models::Recurrence;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Full month name for a zero-based month index, `None` past December.
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get(month as usize).copied()
}

/// Formats a value as Brazilian reais: `R$ 1.234,56`, negatives `-R$ 12,00`.
/// Non-finite values render as zero.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

/// One decimal place, dot separator: `80.0`.
pub fn format_percent(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    if formatted == "-0.0" {
        "0.0".to_string()
    } else {
        formatted
    }
}

pub fn recurrence_label(recurrence: Recurrence) -> &'static str {
    match recurrence {
        Recurrence::Monthly => "Mensal",
        Recurrence::Weekly => "Semanal",
        Recurrence::Yearly => "Anual",
    }
}
