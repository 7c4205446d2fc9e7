//! Form W-2 scraper

use super::{capture, capture_amount};
use crate::core::W2Document;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

lazy_static! {
    // Employee
    static ref SSN: Regex = Regex::new(
        r"(?is)Employee.*?social\s*security\s*number.*?(\d{3}\s*-\s*\d{2}\s*-\s*\d{4})"
    ).unwrap();
    static ref ADDRESS: Regex = Regex::new(
        r"(?is)Employee.*?address.*?\*\*([^*]+)\*\*[\s\S]*?Employer\s*identification\s*number"
    ).unwrap();
    /// First and last name shortly before a street address
    static ref NAME_PRIMARY: Regex = Regex::new(
        r"(?s)\*\*([A-Z][a-z]+)\*\*[^*]*\*\*([A-Z][a-z]+)\*\*[^*]*\*\*\d+\s+\w+\s+St"
    ).unwrap();
    static ref NAME_FALLBACK_FIRST: Regex = Regex::new(
        r"(?is)Employee.*?address.*?ZIP.*?\*\*([A-Z][a-z]+)\*\*"
    ).unwrap();
    static ref NAME_FALLBACK_LAST: Regex = Regex::new(
        r"(?is)Employee.*?address.*?ZIP.*?\*\*[A-Z][a-z]+\*\*[^*]*\*\*([A-Z][a-z]+)\*\*"
    ).unwrap();

    // Employer
    static ref EIN: Regex = Regex::new(
        r"(?is)Employer\s*identification\s*number.*?(\d{2}\s*-\s*\d{7})"
    ).unwrap();
    static ref EMPLOYER_INFO: Regex = Regex::new(
        r"(?is)Employer.*?name,\s*address.*?\*\*([^*]+)\*\*"
    ).unwrap();
    static ref CONTROL_NUMBER: Regex = Regex::new(
        r"(?is)Control\s*number.*?\*\*([^*]+)\*\*"
    ).unwrap();

    // Boxes
    static ref BOX_1: Regex = Regex::new(
        r"(?is)\*\*1\*\*.*?Wages.*?compensation.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_2: Regex = Regex::new(
        r"(?is)\*\*2\*\*.*?Federal\s*income\s*tax\s*withheld.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_3: Regex = Regex::new(
        r"(?is)\*\*3\*\*.*?Social\s*security\s*wages.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_4: Regex = Regex::new(
        r"(?is)\*\*4\*\*.*?Social\s*security\s*tax\s*withheld.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_5: Regex = Regex::new(
        r"(?is)\*\*5\*\*.*?Medicare\s*wages.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_6: Regex = Regex::new(
        r"(?is)\*\*6\*\*.*?Medicare\s*tax\s*withheld.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_7: Regex = Regex::new(
        r"(?is)\*\*7\*\*.*?Social\s*security\s*tips.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_12A_CODE_D: Regex = Regex::new(
        r"(?is)\*\*12a\*\*.*?D:.*?\*\*([0-9,\.]+)"
    ).unwrap();
    static ref BOX_14: Regex = Regex::new(
        r"(?is)\*\*14\*\*.*?Other.*?\*\*([^*]+)\*\*"
    ).unwrap();
    static ref BOX_15: Regex = Regex::new(
        r"(?is)\*\*15\*\*.*?State.*?\*\*([A-Z]{2})\*\*"
    ).unwrap();
    static ref BOX_16: Regex = Regex::new(
        r"(?is)\*\*16\*\*.*?State\s*wages.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
    static ref BOX_17: Regex = Regex::new(
        r"(?is)\*\*17\*\*.*?State\s*income\s*tax.*?\*\*([0-9,\.]+)\*\*"
    ).unwrap();
}

/// Everything read from a W-2, including boxes the tax computation ignores
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct W2Boxes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssn: Option<String>,
    pub address: Option<String>,
    pub employer_name: Option<String>,
    pub employer_address: Option<String>,
    pub employer_ein: Option<String>,
    pub control_number: Option<String>,
    pub wages: Option<Decimal>,
    pub federal_tax_withheld: Option<Decimal>,
    pub ss_wages: Option<Decimal>,
    pub ss_tax_withheld: Option<Decimal>,
    pub medicare_wages: Option<Decimal>,
    pub medicare_tax_withheld: Option<Decimal>,
    pub ss_tips: Option<Decimal>,
    /// Box 12a code D: elective 401(k) deferrals
    pub box_12a_401k: Option<Decimal>,
    pub box_14_other: Option<String>,
    pub state: Option<String>,
    pub state_wages: Option<Decimal>,
    pub state_tax_withheld: Option<Decimal>,
}

impl W2Boxes {
    /// Fields the return needs; unmatched amounts become zero
    pub fn into_document(self, source_file: Option<String>) -> W2Document {
        W2Document {
            source_file,
            first_name: self.first_name,
            last_name: self.last_name,
            ssn: self.ssn,
            address: self.address,
            employer_name: self.employer_name,
            employer_ein: self.employer_ein,
            wages: self.wages.unwrap_or(Decimal::ZERO),
            federal_tax_withheld: self.federal_tax_withheld.unwrap_or(Decimal::ZERO),
            state_tax_withheld: self.state_tax_withheld.unwrap_or(Decimal::ZERO),
        }
    }
}

fn strip_whitespace(s: String) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn employee_name(text: &str) -> (Option<String>, Option<String>) {
    let (first, last) = match NAME_PRIMARY.captures(text) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (
            capture(&NAME_FALLBACK_FIRST, text),
            capture(&NAME_FALLBACK_LAST, text),
        ),
    };
    // A lone first or last name is more likely noise than a name
    match (first, last) {
        (Some(first), Some(last)) => (Some(first), Some(last)),
        _ => (None, None),
    }
}

/// Scrape a rendered W-2
pub fn extract_w2(text: &str) -> W2Boxes {
    let (first_name, last_name) = employee_name(text);

    let (employer_name, employer_address) = match capture(&EMPLOYER_INFO, text) {
        Some(info) => {
            let parts: Vec<&str> = info.split(',').map(str::trim).collect();
            let name = parts.first().map(|s| s.to_string());
            let address = (parts.len() > 1).then(|| parts[1..].join(", "));
            (name, address)
        }
        None => (None, None),
    };

    W2Boxes {
        first_name,
        last_name,
        ssn: capture(&SSN, text).map(strip_whitespace),
        address: capture(&ADDRESS, text),
        employer_name,
        employer_address,
        employer_ein: capture(&EIN, text).map(strip_whitespace),
        control_number: capture(&CONTROL_NUMBER, text),
        wages: capture_amount(&BOX_1, text),
        federal_tax_withheld: capture_amount(&BOX_2, text),
        ss_wages: capture_amount(&BOX_3, text),
        ss_tax_withheld: capture_amount(&BOX_4, text),
        medicare_wages: capture_amount(&BOX_5, text),
        medicare_tax_withheld: capture_amount(&BOX_6, text),
        ss_tips: capture_amount(&BOX_7, text),
        box_12a_401k: capture_amount(&BOX_12A_CODE_D, text),
        box_14_other: capture(&BOX_14, text),
        state: capture(&BOX_15, text),
        state_wages: capture_amount(&BOX_16, text),
        state_tax_withheld: capture_amount(&BOX_17, text),
    }
}
