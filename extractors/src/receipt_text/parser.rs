use std::sync::Arc;

use regex::Regex;
use shared_types::{Clock, ReceiptScan, SystemClock};

use crate::receipt_text::{amount_patterns, date_patterns, AmountPattern};

/// Parses raw OCR output from a receipt photo into a [`ReceiptScan`].
///
/// Parsing never fails: an undetected amount is reported as `None`, an
/// undetected date falls back to the injected clock's current date.
pub struct ReceiptTextParser {
    amount_patterns: Vec<AmountPattern>,
    date_patterns: Vec<Regex>,
    clock: Arc<dyn Clock>,
}

impl ReceiptTextParser {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            amount_patterns: amount_patterns(),
            date_patterns: date_patterns(),
            clock,
        }
    }

    pub fn parse(&self, text: &str) -> ReceiptScan {
        let amount = self.extract_amount(text);
        let date = self
            .extract_date(text)
            .unwrap_or_else(|| self.clock.today().format("%d/%m/%Y").to_string());

        ReceiptScan {
            amount,
            date,
            raw_text: text.to_string(),
        }
    }

    fn extract_amount(&self, text: &str) -> Option<f64> {
        let lowered = text.to_lowercase();

        for pattern in &self.amount_patterns {
            if let Some(captures) = pattern.regex.captures(&lowered) {
                if let Some(matched) = captures.get(1) {
                    // `12,50` and `12.50` are both accepted on receipts.
                    let normalized = matched.as_str().replace(',', ".");
                    if let Ok(amount) = normalized.parse::<f64>() {
                        return Some(amount);
                    }
                }
            }
        }

        None
    }

    fn extract_date(&self, text: &str) -> Option<String> {
        for pattern in &self.date_patterns {
            if let Some(captures) = pattern.captures(text) {
                let day = captures.get(1)?.as_str();
                let month = captures.get(2)?.as_str();
                let year = captures.get(3)?.as_str();

                let year = if year.len() == 2 {
                    format!("20{year}")
                } else {
                    year.to_string()
                };

                return Some(format!("{day}/{month}/{year}"));
            }
        }

        None
    }
}

impl Default for ReceiptTextParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::FixedClock;

    fn test_parser() -> ReceiptTextParser {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        ReceiptTextParser::with_clock(Arc::new(clock))
    }

    #[test]
    fn test_euro_suffix_amount() {
        let scan = test_parser().parse("BOULANGERIE PAUL 12.50€ merci");
        assert_eq!(scan.amount, Some(12.50));
    }

    #[test]
    fn test_comma_decimal_is_normalized() {
        let scan = test_parser().parse("CARREFOUR 8,40€");
        assert_eq!(scan.amount, Some(8.40));
    }

    #[test]
    fn test_euro_prefix_amount() {
        let scan = test_parser().parse("montant € 7.20 merci");
        assert_eq!(scan.amount, Some(7.20));
    }

    #[test]
    fn test_total_line_without_currency_sign() {
        let scan = test_parser().parse("TOTAL: 9,99\nmerci de votre visite");
        assert_eq!(scan.amount, Some(9.99));
    }

    #[test]
    fn test_eur_word_amount() {
        let scan = test_parser().parse("a payer 4,50 EUR");
        assert_eq!(scan.amount, Some(4.50));
    }

    #[test]
    fn test_pattern_precedence_euro_suffix_beats_total_line() {
        // Both the total line and a bare euro-suffixed amount are present;
        // the euro-suffix pattern is consulted first and must win.
        let scan = test_parser().parse("total: 9,99 dont TVA 3,00€");
        assert_eq!(scan.amount, Some(3.00));
    }

    #[test]
    fn test_no_amount_and_two_digit_year() {
        let scan = test_parser().parse("no amount here, date 05/03/24");
        assert_eq!(scan.amount, None);
        assert_eq!(scan.date, "05/03/2024");
    }

    #[test]
    fn test_four_digit_year_kept_as_is() {
        let scan = test_parser().parse("CB 02/01/2025");
        assert_eq!(scan.date, "02/01/2025");
    }

    #[test]
    fn test_dash_separated_date() {
        let scan = test_parser().parse("le 02-01-2025");
        assert_eq!(scan.date, "02/01/2025");
    }

    #[test]
    fn test_missing_date_falls_back_to_clock() {
        let scan = test_parser().parse("CAFE 3,00€ sans date");
        assert_eq!(scan.date, "15/06/2025");
    }

    #[test]
    fn test_full_receipt_scenario() {
        let scan = test_parser().parse("MERCI TOTAL 15,00€ 02/01/2025");
        assert_eq!(scan.amount, Some(15.00));
        assert_eq!(scan.date, "02/01/2025");
        assert_eq!(scan.raw_text, "MERCI TOTAL 15,00€ 02/01/2025");
    }
}
