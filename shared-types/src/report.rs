use serde::{Deserialize, Serialize};

use crate::expense::ExpenseCategory;

/// Total and ticket count for one category within a recap period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
    pub count: usize,
}

/// Monthly aggregation grouped by category, in first-appearance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRecap {
    pub categories: Vec<CategoryTotal>,
    pub grand_total: f64,
}

/// Per-category share of all recorded expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: ExpenseCategory,
    pub total: f64,
    /// Share of the grand total, 0–100. Zero when the grand total is zero.
    pub percentage: f64,
}

/// One line of the tabular export. Field renames become the CSV header.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Catégorie")]
    pub category: String,
    #[serde(rename = "Montant (€)")]
    pub amount: f64,
}
