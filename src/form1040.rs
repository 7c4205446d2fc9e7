//! Form 1040 field map.
//!
//! Keys are the AcroForm field names of the IRS fillable 1040. Checkboxes take
//! the export value of the state to select (`/1`, `/2`, ...); text fields take
//! the printed string.

use crate::core::{Answer, FilingStatus, Person, TaxSummary, TaxYear, TaxpayerProfile};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Address split into the 1040 address block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub apt: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

const UNIT_WORDS: [&str; 6] = ["apt", "apt.", "unit", "suite", "ste", "ste."];

fn is_unit_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.starts_with('#') || UNIT_WORDS.contains(&lower.as_str())
}

/// Capitalise the first letter of every word, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start_of_word = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = !c.is_alphanumeric() && c != '\'';
        }
    }
    out
}

/// Split "street [apt], city, ST zip". With fewer than three comma separated
/// parts the whole string goes in `street`.
pub fn parse_address(address: &str) -> Address {
    let address = address.trim();
    if address.is_empty() {
        return Address::default();
    }

    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Address {
            street: title_case(address),
            ..Default::default()
        };
    }

    let street_section = parts[0];
    let city = parts[parts.len() - 2];
    let state_zip: Vec<&str> = parts[parts.len() - 1].split_whitespace().collect();
    let (state, zip) = match state_zip.as_slice() {
        [state, zip, ..] => (state.to_uppercase(), zip.to_string()),
        _ => (String::new(), String::new()),
    };

    let tokens: Vec<&str> = street_section.split_whitespace().collect();
    let (street, apt) = match tokens.iter().position(|t| is_unit_token(t)) {
        // A leading unit marker is more likely part of the street itself
        Some(i) if i > 0 => (tokens[..i].join(" "), tokens[i..].join(" ")),
        _ => (street_section.to_string(), String::new()),
    };

    Address {
        street: title_case(street.trim()),
        apt: title_case(apt.trim()),
        city: title_case(city),
        state,
        zip,
    }
}

fn page1(name: &str) -> String {
    format!("topmostSubform[0].Page1[0].{name}")
}

fn page2(name: &str) -> String {
    format!("topmostSubform[0].Page2[0].{name}")
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn is_yes(answer: Option<Answer>) -> bool {
    answer.is_some_and(Answer::is_yes)
}

fn is_senior(person_dob: Option<chrono::NaiveDate>, year: TaxYear) -> bool {
    person_dob.is_some_and(|dob| year.is_senior(dob))
}

/// Field values for a completed 1040
pub fn fill_fields(
    profile: &TaxpayerProfile,
    summary: &TaxSummary,
    year: TaxYear,
) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut set = |name: String, value: String| {
        fields.insert(name, value);
    };

    set(page1("f1_04[0]"), text(&profile.first_name));
    set(page1("f1_05[0]"), text(&profile.last_name));
    set(page1("f1_06[0]"), text(&profile.ssn));

    let address = parse_address(profile.address.as_deref().unwrap_or_default());
    set(page1("Address_ReadOrder[0].f1_10[0]"), address.street);
    set(page1("Address_ReadOrder[0].f1_11[0]"), address.apt);
    set(page1("Address_ReadOrder[0].f1_12[0]"), address.city);
    set(page1("Address_ReadOrder[0].f1_13[0]"), address.state);
    set(page1("Address_ReadOrder[0].f1_14[0]"), address.zip);

    let spouse = profile.spouse_info.clone().unwrap_or_default();
    match summary.filing_status {
        FilingStatus::Single => {
            set(page1("FilingStatus_ReadOrder[0].c1_3[0]"), "/1".to_string());
        }
        FilingStatus::HeadOfHousehold => {
            set(page1("c1_3[0]"), "/2".to_string());
        }
        FilingStatus::MarriedFilingJointly => {
            set(page1("FilingStatus_ReadOrder[0].c1_3[1]"), "/3".to_string());
            set(page1("f1_07[0]"), text(&spouse.first_name));
            set(page1("f1_08[0]"), text(&spouse.last_name));
            set(page1("f1_09[0]"), text(&spouse.ssn));
        }
        FilingStatus::MarriedFilingSeparately => {
            set(page1("FilingStatus_ReadOrder[0].c1_3[2]"), "/4".to_string());
            set(page1("f1_18[0]"), spouse.full_name());
        }
        FilingStatus::QualifyingSurvivingSpouse => {
            set(page1("c1_3[1]"), "/5".to_string());
        }
    }

    if is_yes(profile.received_or_sold_digital_asset) {
        set(page1("c1_5[0]"), "/1".to_string());
    } else {
        set(page1("c1_5[1]"), "/2".to_string());
    }

    // Standard deduction checkboxes
    if is_senior(profile.date_of_birth, year) {
        set(page1("c1_9[0]"), "/1".to_string());
    }
    if is_yes(profile.is_blind) {
        set(page1("c1_10[0]"), "/1".to_string());
    }
    if summary.filing_status.has_spouse() {
        let Person {
            date_of_birth,
            is_blind,
            ..
        } = spouse;
        if is_senior(date_of_birth, year) {
            set(page1("c1_11[0]"), "/1".to_string());
        }
        if is_yes(is_blind) {
            set(page1("c1_12[0]"), "/1".to_string());
        }
    }

    // Lines 1a, 1z, 2b
    set(page1("f1_32[0]"), amount(summary.wages));
    set(page1("f1_41[0]"), amount(summary.wages));
    set(page1("f1_43[0]"), amount(summary.interest_income));
    // Lines 8, 9, 11
    set(
        page1("Line4a-11_ReadOrder[0].f1_53[0]"),
        amount(summary.self_employment_income),
    );
    set(
        page1("Line4a-11_ReadOrder[0].f1_54[0]"),
        amount(summary.gross_income),
    );
    set(
        page1("Line4a-11_ReadOrder[0].f1_56[0]"),
        amount(summary.gross_income),
    );
    // Lines 12, 14, 15
    set(page1("f1_57[0]"), amount(summary.standard_deduction));
    set(page1("f1_59[0]"), amount(summary.standard_deduction));
    set(page1("f1_60[0]"), amount(summary.taxable_income));

    // Lines 16, 18, 24
    set(page2("f2_02[0]"), amount(summary.tax_owed));
    set(page2("f2_04[0]"), amount(summary.tax_owed));
    set(page2("f2_10[0]"), amount(summary.tax_owed));
    // Lines 25d, 33
    set(page2("f2_14[0]"), amount(summary.federal_tax_withheld));
    set(page2("f2_22[0]"), amount(summary.federal_tax_withheld));

    if summary.is_refund() {
        // Line 34, overpaid
        set(page2("f2_23[0]"), amount(summary.refund_or_amount_due));
    } else {
        // Line 37, amount you owe
        set(page2("f2_28[0]"), amount(summary.refund_or_amount_due.abs()));
    }

    fields
}
