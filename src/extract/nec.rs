//! Form 1099-NEC scraper

use super::{capture, capture_amount};
use crate::core::CompensationDocument;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    /// First bold run ending in a company suffix
    static ref PAYER: Regex = Regex::new(
        r"\*\*([A-Za-z0-9\s\.,&'-]+(?:Inc\.|LLC|Corp|N\.A\.)[,\.]?)\*\*"
    ).unwrap();
    static ref RECIPIENT_ADDRESS: Regex = Regex::new(
        r"foreign postal code[<br>\n\|]*\*\*([^*]+)\*\*[<br>\n\|]*\*\*([^*]+)\*\*"
    ).unwrap();
    static ref BOX_1: Regex = Regex::new(
        r"\*\*1\s*\*\*Nonemployee compensation[<br>\n\$\|]*\*\*([0-9,]+\.?\d*)\*\*"
    ).unwrap();
    static ref BOX_4: Regex = Regex::new(
        r"\*\*4\s*\*\*Federal income tax withheld[<br>\n\$\|]*\*\*([0-9,]+\.?\d*)\*\*"
    ).unwrap();
    static ref BOX_5: Regex = Regex::new(
        r"\*\*5\s*\*\*State tax withheld[<br>\n\$\|]*\*\*([0-9,]+\.?\d*)\*\*"
    ).unwrap();
    static ref BOX_7: Regex = Regex::new(
        r"\*\*7\s*\*\*State income[<br>\n\$\|]*\*\*([0-9,]+\.?\d*)\*\*"
    ).unwrap();
}

/// Scrape a rendered 1099-NEC
pub fn extract_1099_nec(text: &str) -> CompensationDocument {
    let recipient_address = RECIPIENT_ADDRESS
        .captures(text)
        .map(|caps| format!("{}, {}", &caps[1], &caps[2]));

    CompensationDocument {
        source_file: None,
        payer_name: capture(&PAYER, text),
        recipient_address,
        nonemployee_compensation: capture_amount(&BOX_1, text).unwrap_or(Decimal::ZERO),
        federal_tax_withheld: capture_amount(&BOX_4, text).unwrap_or(Decimal::ZERO),
        state_tax_withheld: capture_amount(&BOX_5, text).unwrap_or(Decimal::ZERO),
        state_income: capture_amount(&BOX_7, text).unwrap_or(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
|PAYER'S name, street address, city or town|**Brightline Consulting LLC**|
|RECIPIENT'S name<br>Street address<br>City or town, state or province, country, and ZIP or foreign postal code|<br>**42 Elm St**<br>**Springfield, IL 62704**|
|**1 **Nonemployee compensation<br>$|**12,500.00**|
|**4 **Federal income tax withheld<br>$|**1,250.00**|
|**5 **State tax withheld<br>$|**400.00**|
|**7 **State income<br>$|**12,500**|
";

    #[test]
    fn scrapes_boxes() {
        let doc = extract_1099_nec(SAMPLE);
        assert_eq!(doc.nonemployee_compensation, dec!(12500.00));
        assert_eq!(doc.federal_tax_withheld, dec!(1250.00));
        assert_eq!(doc.state_tax_withheld, dec!(400.00));
        assert_eq!(doc.state_income, dec!(12500));
    }

    #[test]
    fn scrapes_payer_and_recipient() {
        let doc = extract_1099_nec(SAMPLE);
        assert_eq!(doc.payer_name.as_deref(), Some("Brightline Consulting LLC"));
        assert_eq!(
            doc.recipient_address.as_deref(),
            Some("42 Elm St, Springfield, IL 62704")
        );
    }

    #[test]
    fn missing_boxes_are_zero() {
        let doc = extract_1099_nec("**1 **Nonemployee compensation|**800**|");
        assert_eq!(doc.nonemployee_compensation, dec!(800));
        assert_eq!(doc.federal_tax_withheld, Decimal::ZERO);
        assert_eq!(doc.payer_name, None);
        assert_eq!(doc.recipient_address, None);
    }
}
