mod parser;

pub use parser::ReceiptTextParser;

use regex::Regex;

/// One amount pattern in the fixed precedence list.
pub(crate) struct AmountPattern {
    pub(crate) name: &'static str,
    pub(crate) regex: Regex,
}

/// Ordered amount patterns, matched against the lowercased receipt text.
///
/// The first pattern that matches anywhere in the text wins; later patterns
/// are never consulted after a match, even when they would capture a
/// different amount. Changing the order changes which amount is extracted.
pub(crate) fn amount_patterns() -> Vec<AmountPattern> {
    vec![
        AmountPattern {
            name: "euro_suffix",
            regex: Regex::new(r"(\d+[.,]\d{2})\s*€").unwrap(),
        },
        AmountPattern {
            name: "euro_prefix",
            regex: Regex::new(r"€\s*(\d+[.,]\d{2})").unwrap(),
        },
        AmountPattern {
            name: "total_line",
            regex: Regex::new(r"total[:\s]+(\d+[.,]\d{2})").unwrap(),
        },
        AmountPattern {
            name: "eur_suffix",
            regex: Regex::new(r"(\d+[.,]\d{2})\s*eur").unwrap(),
        },
    ]
}

/// Date patterns: 4-digit year first, then the 2-digit fallback. A 2-digit
/// year is expanded by prefixing `20`.
pub(crate) fn date_patterns() -> Vec<Regex> {
    vec![
        Regex::new(r"(\d{2})[/-](\d{2})[/-](\d{4})").unwrap(),
        Regex::new(r"(\d{2})[/-](\d{2})[/-](\d{2})").unwrap(),
    ]
}
