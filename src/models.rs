use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Returned by `/auth/login` and `/auth/register`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Cadence label of an income source. Purely descriptive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Monthly,
    Weekly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Monthly => "monthly",
            Recurrence::Weekly => "weekly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Recurrence::Monthly),
            "weekly" => Ok(Recurrence::Weekly),
            "yearly" => Ok(Recurrence::Yearly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Income {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub recurrence: Recurrence,
    pub receive_date: i64,
}

/// Body of `POST /incomes` and `PUT /incomes/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IncomePayload {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub recurrence: Recurrence,
    pub receive_date: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExpenseCategory {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategoryPayload {
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// An expense. The `category_*` fields are filled by the server from the
/// referenced category and stay `None` once that category is deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_icon: Option<String>,
    pub amount: f64,
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExpensePayload {
    pub amount: f64,
    pub category_id: i64,
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PiggyBank {
    pub id: i64,
    pub name: String,
    pub goal: String,
    pub bank: String,
    pub balance: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PiggyBankPayload {
    pub name: String,
    pub goal: String,
    pub bank: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PiggyTransaction {
    pub id: i64,
    pub piggy_bank_id: i64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PiggyTransactionPayload {
    pub piggy_bank_id: i64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to today (UTC) when omitted.
    #[serde(default)]
    pub date: Option<String>,
}

/// Per-category expense total, shared by the pie chart, the ranking and
/// `/reports/expenses-by-category`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearlyComparisonEntry {
    /// Calendar month, 1 = January.
    pub month: u8,
    #[serde(default)]
    pub incomes: f64,
    #[serde(default)]
    pub expenses: f64,
}

#[derive(Deserialize)]
pub struct YearlyComparisonQuery {
    pub year: i32,
}

#[derive(Deserialize)]
pub struct ExpensesByCategoryQuery {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}
