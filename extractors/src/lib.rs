//! Extractors Crate
//!
//! Turns raw OCR output from receipt photos into structured candidate
//! records (amount, date). Parsing is pure and never fails: missing data
//! degrades to `None` amounts and a clock-based fallback date.
//!
//! # Architecture
//!
//! - **Types**: `ReceiptScan` and the `Clock` abstraction live in the
//!   `shared-types` crate
//! - **Implementations**: concrete parsers are implemented here
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::ReceiptTextParser;
//!
//! let parser = ReceiptTextParser::new();
//! let scan = parser.parse("MERCI TOTAL 15,00€ 02/01/2025");
//! assert_eq!(scan.amount, Some(15.00));
//! ```

pub mod receipt_text;

// Re-export the main entry point
pub use receipt_text::ReceiptTextParser;
