use serde::{Deserialize, Serialize};

/// Parsed-but-unconfirmed receipt data produced from OCR output.
///
/// Consumed once by the conversation flow: the user confirms a category
/// (and, when no amount was detected, types one) before the scan becomes a
/// stored [`crate::Expense`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptScan {
    /// Detected amount, currency-agnostic. `None` triggers the
    /// manual-amount follow-up.
    pub amount: Option<f64>,
    /// `DD/MM/YYYY`; never absent. Falls back to the parse-time date when
    /// the receipt carries no recognizable date.
    pub date: String,
    /// Full OCR text, retained for audit and debugging.
    pub raw_text: String,
}
