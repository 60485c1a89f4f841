use std::sync::Mutex;

use shared_types::{Expense, ExpenseCategory};

/// In-memory, insertion-ordered store of recorded expenses.
///
/// The store owns the expense sequence for the process lifetime; nothing is
/// persisted across restarts. Ids count every expense ever created, so a
/// deleted id is never reassigned and the set of live ids need not be
/// contiguous. Lookup by id is a linear scan.
pub struct ExpenseStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    expenses: Vec<Expense>,
    created_count: i64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Assembles an expense with the next id and appends it.
    pub fn commit(
        &self,
        date: &str,
        amount: f64,
        category: ExpenseCategory,
        created_at: i64,
    ) -> Expense {
        let mut inner = self.inner.lock().unwrap();
        inner.created_count += 1;

        let expense = Expense {
            id: inner.created_count,
            date: date.to_string(),
            amount,
            category,
            created_at,
        };
        inner.expenses.push(expense.clone());
        expense
    }

    /// Appends an already-assembled expense at the end of the sequence.
    /// No dedup. Keeps the id counter ahead so later commits never reuse
    /// the appended id.
    pub fn append(&self, expense: Expense) {
        let mut inner = self.inner.lock().unwrap();
        inner.created_count = inner.created_count.max(expense.id);
        inner.expenses.push(expense);
    }

    pub fn find_by_id(&self, id: i64) -> Option<Expense> {
        let inner = self.inner.lock().unwrap();
        inner.expenses.iter().find(|e| e.id == id).cloned()
    }

    /// Removes the expense with the given id. Returns `true` only when
    /// something was actually removed.
    pub fn remove_by_id(&self, id: i64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.expenses.len();
        inner.expenses.retain(|e| e.id != id);
        inner.expenses.len() != before
    }

    /// Expenses whose `DD/MM/YYYY` date ends with `MM/YYYY`. The stored
    /// format is fixed-width, which makes the suffix comparison exact.
    pub fn filter_by_month_year(&self, month: &str, year: &str) -> Vec<Expense> {
        let suffix = format!("{month}/{year}");
        let inner = self.inner.lock().unwrap();
        inner
            .expenses
            .iter()
            .filter(|e| e.date.ends_with(&suffix))
            .cloned()
            .collect()
    }

    /// Expenses whose date ends with the 4-digit year.
    pub fn filter_by_year(&self, year: &str) -> Vec<Expense> {
        let inner = self.inner.lock().unwrap();
        inner
            .expenses
            .iter()
            .filter(|e| e.date.ends_with(year))
            .cloned()
            .collect()
    }

    /// Every expense, in insertion order.
    pub fn all(&self) -> Vec<Expense> {
        self.inner.lock().unwrap().expenses.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().expenses.is_empty()
    }

    /// Running total for a `MM/YYYY` period, for confirmation messages.
    pub fn monthly_total(&self, month_year: &str) -> f64 {
        let inner = self.inner.lock().unwrap();
        inner
            .expenses
            .iter()
            .filter(|e| e.date.ends_with(month_year))
            .map(|e| e.amount)
            .sum()
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_assigns_sequential_ids() {
        let store = ExpenseStore::new();

        let first = store.commit("02/01/2025", 15.0, ExpenseCategory::Supplies, 0);
        let second = store.commit("03/01/2025", 8.5, ExpenseCategory::Other, 0);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_find_by_id_round_trip() {
        let store = ExpenseStore::new();
        let committed = store.commit("02/01/2025", 15.0, ExpenseCategory::Supplies, 42);

        let found = store.find_by_id(committed.id).unwrap();
        assert_eq!(found.date, "02/01/2025");
        assert_eq!(found.amount, 15.0);
        assert_eq!(found.category, ExpenseCategory::Supplies);
        assert_eq!(found.created_at, 42);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = ExpenseStore::new();
        let expense = store.commit("02/01/2025", 15.0, ExpenseCategory::Supplies, 0);

        assert!(store.remove_by_id(expense.id));
        assert!(!store.remove_by_id(expense.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused_after_deletion() {
        let store = ExpenseStore::new();
        store.commit("01/01/2025", 1.0, ExpenseCategory::Other, 0);
        let second = store.commit("02/01/2025", 2.0, ExpenseCategory::Other, 0);

        assert!(store.remove_by_id(second.id));

        let third = store.commit("03/01/2025", 3.0, ExpenseCategory::Other, 0);
        assert_eq!(third.id, 3);
        assert!(store.find_by_id(2).is_none());
    }

    #[test]
    fn test_append_keeps_id_counter_ahead() {
        let store = ExpenseStore::new();
        store.append(Expense {
            id: 5,
            date: "01/01/2025".to_string(),
            amount: 9.0,
            category: ExpenseCategory::Training,
            created_at: 0,
        });

        assert_eq!(store.find_by_id(5).unwrap().amount, 9.0);

        // The next commit must not reuse an id at or below the appended one.
        let next = store.commit("02/01/2025", 1.0, ExpenseCategory::Other, 0);
        assert_eq!(next.id, 6);
    }

    #[test]
    fn test_filter_by_month_year_guards_against_false_suffixes() {
        let store = ExpenseStore::new();
        store.commit("15/07/2024", 10.0, ExpenseCategory::Supplies, 0);
        store.commit("07/12/2024", 20.0, ExpenseCategory::Supplies, 0);
        store.commit("15/07/2023", 30.0, ExpenseCategory::Supplies, 0);

        let july = store.filter_by_month_year("07", "2024");
        assert_eq!(july.len(), 1);
        assert_eq!(july[0].date, "15/07/2024");
    }

    #[test]
    fn test_filter_by_year() {
        let store = ExpenseStore::new();
        store.commit("15/07/2024", 10.0, ExpenseCategory::Supplies, 0);
        store.commit("15/07/2023", 30.0, ExpenseCategory::Supplies, 0);

        let in_2024 = store.filter_by_year("2024");
        assert_eq!(in_2024.len(), 1);
        assert_eq!(in_2024[0].date, "15/07/2024");
    }

    #[test]
    fn test_monthly_total() {
        let store = ExpenseStore::new();
        store.commit("15/07/2024", 10.0, ExpenseCategory::Supplies, 0);
        store.commit("20/07/2024", 5.5, ExpenseCategory::Other, 0);
        store.commit("15/08/2024", 99.0, ExpenseCategory::Other, 0);

        assert_eq!(store.monthly_total("07/2024"), 15.5);
    }
}
