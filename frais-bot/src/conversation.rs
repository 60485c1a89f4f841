use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared_types::{Clock, Expense, ExpenseCategory, ReceiptScan};

use crate::store::ExpenseStore;

/// Pending state of one conversation. Idle conversations have no entry.
#[derive(Debug)]
enum PendingState {
    /// A scanned receipt waits for the user to pick a category.
    AwaitingCategory(ReceiptScan),
    /// The category is chosen but no amount was detected; the user must
    /// type one. The candidate's date is retained.
    AwaitingManualAmount {
        date: String,
        category: ExpenseCategory,
    },
}

/// Outcome of a category selection.
#[derive(Debug)]
pub enum CategoryOutcome {
    Committed(Expense),
    AmountNeeded(ExpenseCategory),
    /// No pending candidate exists for this conversation (for example the
    /// process restarted between the photo and the button press).
    SessionExpired,
}

/// Outcome of a free-text message that may be a manual amount.
#[derive(Debug)]
pub enum AmountOutcome {
    Committed(Expense),
    InvalidAmount,
    /// The conversation is not waiting for an amount; the text is ignored.
    NotAwaiting,
}

/// Per-conversation state machine for receipts awaiting categorization or
/// a manually typed amount.
///
/// Each conversation holds at most one pending record; a new photo replaces
/// any unfinished one without warning. Conversations never interfere with
/// each other. Completed records are committed into the [`ExpenseStore`].
pub struct ExpenseFlow {
    store: Arc<ExpenseStore>,
    pending: Mutex<HashMap<i64, PendingState>>,
    clock: Arc<dyn Clock>,
}

impl ExpenseFlow {
    pub fn new(store: Arc<ExpenseStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            pending: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// A processed photo always moves the conversation to awaiting a
    /// category, discarding any unfinished entry.
    pub fn begin(&self, chat_id: i64, scan: ReceiptScan) {
        let mut pending = self.pending.lock().unwrap();
        pending.insert(chat_id, PendingState::AwaitingCategory(scan));
    }

    pub fn choose_category(&self, chat_id: i64, category: ExpenseCategory) -> CategoryOutcome {
        let mut pending = self.pending.lock().unwrap();

        match pending.remove(&chat_id) {
            Some(PendingState::AwaitingCategory(scan)) => match scan.amount {
                Some(amount) => {
                    drop(pending);
                    let expense =
                        self.store
                            .commit(&scan.date, amount, category, self.clock.timestamp());
                    CategoryOutcome::Committed(expense)
                }
                None => {
                    pending.insert(
                        chat_id,
                        PendingState::AwaitingManualAmount {
                            date: scan.date,
                            category,
                        },
                    );
                    CategoryOutcome::AmountNeeded(category)
                }
            },
            Some(PendingState::AwaitingManualAmount { date, .. }) => {
                // Category picked again while the amount is still missing:
                // keep waiting, under the newly chosen category.
                pending.insert(
                    chat_id,
                    PendingState::AwaitingManualAmount { date, category },
                );
                CategoryOutcome::AmountNeeded(category)
            }
            None => CategoryOutcome::SessionExpired,
        }
    }

    pub fn enter_amount(&self, chat_id: i64, text: &str) -> AmountOutcome {
        let mut pending = self.pending.lock().unwrap();

        match pending.remove(&chat_id) {
            Some(PendingState::AwaitingManualAmount { date, category }) => {
                match text.trim().replace(',', ".").parse::<f64>() {
                    Ok(amount) => {
                        drop(pending);
                        let expense =
                            self.store
                                .commit(&date, amount, category, self.clock.timestamp());
                        AmountOutcome::Committed(expense)
                    }
                    Err(_) => {
                        pending.insert(
                            chat_id,
                            PendingState::AwaitingManualAmount { date, category },
                        );
                        AmountOutcome::InvalidAmount
                    }
                }
            }
            Some(state) => {
                pending.insert(chat_id, state);
                AmountOutcome::NotAwaiting
            }
            None => AmountOutcome::NotAwaiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::FixedClock;

    fn test_flow() -> (Arc<ExpenseStore>, ExpenseFlow) {
        let store = Arc::new(ExpenseStore::new());
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        let flow = ExpenseFlow::new(store.clone(), Arc::new(clock));
        (store, flow)
    }

    fn scan(amount: Option<f64>, date: &str) -> ReceiptScan {
        ReceiptScan {
            amount,
            date: date.to_string(),
            raw_text: "MERCI".to_string(),
        }
    }

    #[test]
    fn test_detected_amount_commits_on_category() {
        let (store, flow) = test_flow();
        flow.begin(7, scan(Some(15.0), "02/01/2025"));

        match flow.choose_category(7, ExpenseCategory::Supplies) {
            CategoryOutcome::Committed(expense) => {
                assert_eq!(expense.id, 1);
                assert_eq!(expense.amount, 15.0);
                assert_eq!(expense.date, "02/01/2025");
                assert_eq!(expense.category, ExpenseCategory::Supplies);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let stored = store.find_by_id(1).unwrap();
        assert_eq!(stored.amount, 15.0);
        assert_eq!(stored.category, ExpenseCategory::Supplies);
    }

    #[test]
    fn test_missing_amount_goes_through_manual_entry() {
        let (store, flow) = test_flow();
        flow.begin(7, scan(None, "02/01/2025"));

        match flow.choose_category(7, ExpenseCategory::Other) {
            CategoryOutcome::AmountNeeded(category) => {
                assert_eq!(category, ExpenseCategory::Other)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        match flow.enter_amount(7, "7,5") {
            AmountOutcome::Committed(expense) => {
                assert_eq!(expense.amount, 7.5);
                assert_eq!(expense.date, "02/01/2025");
                assert_eq!(expense.category, ExpenseCategory::Other);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_invalid_amount_keeps_state() {
        let (store, flow) = test_flow();
        flow.begin(7, scan(None, "02/01/2025"));
        flow.choose_category(7, ExpenseCategory::Other);

        assert!(matches!(
            flow.enter_amount(7, "pas un nombre"),
            AmountOutcome::InvalidAmount
        ));
        assert!(store.is_empty());

        // The retry with a valid amount still commits.
        assert!(matches!(
            flow.enter_amount(7, "12.00"),
            AmountOutcome::Committed(_)
        ));
    }

    #[test]
    fn test_category_without_pending_candidate_expires() {
        let (_, flow) = test_flow();
        assert!(matches!(
            flow.choose_category(7, ExpenseCategory::Supplies),
            CategoryOutcome::SessionExpired
        ));
    }

    #[test]
    fn test_free_text_is_ignored_when_not_awaiting_amount() {
        let (_, flow) = test_flow();
        assert!(matches!(
            flow.enter_amount(7, "15.50"),
            AmountOutcome::NotAwaiting
        ));

        // Also while a category choice is pending.
        flow.begin(7, scan(Some(15.0), "02/01/2025"));
        assert!(matches!(
            flow.enter_amount(7, "15.50"),
            AmountOutcome::NotAwaiting
        ));
    }

    #[test]
    fn test_new_photo_replaces_unfinished_entry() {
        let (_, flow) = test_flow();
        flow.begin(7, scan(None, "01/01/2025"));
        flow.choose_category(7, ExpenseCategory::Other);

        // A fresh photo arrives before the amount was typed.
        flow.begin(7, scan(Some(20.0), "03/01/2025"));

        match flow.choose_category(7, ExpenseCategory::Training) {
            CategoryOutcome::Committed(expense) => {
                assert_eq!(expense.amount, 20.0);
                assert_eq!(expense.date, "03/01/2025");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_conversations_do_not_interfere() {
        let (store, flow) = test_flow();
        flow.begin(1, scan(Some(10.0), "01/01/2025"));
        flow.begin(2, scan(None, "02/01/2025"));

        assert!(matches!(
            flow.choose_category(1, ExpenseCategory::Supplies),
            CategoryOutcome::Committed(_)
        ));
        assert!(matches!(
            flow.choose_category(2, ExpenseCategory::Other),
            CategoryOutcome::AmountNeeded(_)
        ));
        assert!(matches!(
            flow.enter_amount(2, "4,00"),
            AmountOutcome::Committed(_)
        ));
        assert_eq!(store.all().len(), 2);
    }
}
