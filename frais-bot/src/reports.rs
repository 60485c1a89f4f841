use shared_types::{CategoryStat, CategoryTotal, Expense, ExpenseCategory, ExportRow, MonthlyRecap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(#[from] std::io::Error),
}

/// Per-category totals and counts for one recap period, grouped in
/// first-appearance order. Returns `None` for an empty slice so callers
/// report "nothing found" instead of rendering a zero recap.
pub fn monthly_recap(expenses: &[Expense]) -> Option<MonthlyRecap> {
    if expenses.is_empty() {
        return None;
    }

    let mut categories: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match categories
            .iter_mut()
            .find(|entry| entry.category == expense.category)
        {
            Some(entry) => {
                entry.total += expense.amount;
                entry.count += 1;
            }
            None => categories.push(CategoryTotal {
                category: expense.category,
                total: expense.amount,
                count: 1,
            }),
        }
    }

    let grand_total = expenses.iter().map(|e| e.amount).sum();
    Some(MonthlyRecap {
        categories,
        grand_total,
    })
}

/// Per-category totals and shares of the grand total, highest total first.
/// A zero grand total yields zero percentages rather than dividing by zero.
pub fn category_stats(expenses: &[Expense]) -> Vec<CategoryStat> {
    let mut totals: Vec<(ExpenseCategory, f64)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, total)) => *total += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }

    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    let mut stats: Vec<CategoryStat> = totals
        .into_iter()
        .map(|(category, total)| CategoryStat {
            category,
            total,
            percentage: if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    stats
}

/// Tabular rows [date, category, amount] plus a trailing TOTAL row. An
/// empty period is an error for the caller to surface, not an empty file.
pub fn export_rows(expenses: &[Expense]) -> Result<Vec<ExportRow>, ExportError> {
    if expenses.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut rows: Vec<ExportRow> = expenses
        .iter()
        .map(|expense| ExportRow {
            date: expense.date.clone(),
            category: expense.category.label().to_string(),
            amount: expense.amount,
        })
        .collect();

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    rows.push(ExportRow {
        date: String::new(),
        category: "TOTAL".to_string(),
        amount: total,
    });

    Ok(rows)
}

/// Serializes export rows to CSV bytes (header included).
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.into_error()))
}

/// `expenses_<month>_<year>.csv` for a monthly export, `expenses_<year>.csv`
/// for a yearly one.
pub fn export_filename(month: Option<&str>, year: &str) -> String {
    match month {
        Some(month) => format!("expenses_{month}_{year}.csv"),
        None => format!("expenses_{year}.csv"),
    }
}
