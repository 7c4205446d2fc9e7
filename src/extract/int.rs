//! Form 1099-INT scraper
//!
//! Bank 1099-INT renderings carry few labels, so most fields are located by
//! position: the payer follows the tax year, the recipient follows the TINs.

use super::capture;
use crate::core::InterestDocument;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

lazy_static! {
    static ref PAYER: Regex = Regex::new(r"(?s)202[3-5]\n(.+?)\n\d").unwrap();
    /// Payer EIN directly followed by recipient SSN
    static ref TINS: Regex = Regex::new(r"(\d{2}-\d{7})(\d{3}-\d{2}-\d{4})").unwrap();
    static ref RECIPIENT: Regex =
        Regex::new(r"\d{3}-\d{2}-\d{4}\n([A-Z][a-z]+ [A-Z][a-z]+)").unwrap();
    static ref AMOUNT: Regex = Regex::new(r"(\d+\.\d{2})").unwrap();
}

/// Largest amount still read as state tax withheld
const STATE_TAX_CEILING: Decimal = dec!(10);

fn amounts(text: &str) -> Vec<Decimal> {
    AMOUNT
        .captures_iter(text)
        .filter_map(|caps| Decimal::from_str(&caps[1]).ok())
        .collect()
}

/// Scrape a rendered 1099-INT
pub fn extract_1099_int(text: &str) -> InterestDocument {
    let payer_name = capture(&PAYER, text)
        .and_then(|block| block.lines().next().map(|line| line.trim().to_string()))
        .filter(|line| !line.is_empty());

    let (payer_tin, recipient_tin) = match TINS.captures(text) {
        Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
        None => (None, None),
    };

    let amounts = amounts(text);
    // Box 1 is the first amount above a dollar
    let interest_income = amounts
        .iter()
        .copied()
        .find(|a| *a > Decimal::ONE)
        .unwrap_or(Decimal::ZERO);
    // Box 17 is usually the last small amount on the form
    let state_tax_withheld = amounts
        .iter()
        .copied()
        .filter(|a| *a > Decimal::ZERO && *a <= STATE_TAX_CEILING)
        .last()
        .unwrap_or(Decimal::ZERO);

    InterestDocument {
        source_file: None,
        payer_name,
        payer_tin,
        recipient_tin,
        recipient_name: capture(&RECIPIENT, text),
        interest_income,
        federal_tax_withheld: Decimal::ZERO,
        state_tax_withheld,
    }
}
