//! Year-indexed standard deductions and bracket schedules.
//!
//! A [`TaxTable`] is built once, validated, and then only read. It is passed by
//! reference to everything that needs it.

use super::error::TaxError;
use super::us::{FilingStatus, TaxYear};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const EMBEDDED_TABLE: &str = include_str!("../../data/tax_config.json");

/// One marginal rate band. `max = None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub min: Decimal,
    #[serde(default)]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

/// Figures for a single tax year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTable {
    standard_deductions: BTreeMap<FilingStatus, Decimal>,
    tax_brackets: BTreeMap<FilingStatus, Vec<Bracket>>,
}

/// Read-only store of tax figures keyed by year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    years: BTreeMap<TaxYear, YearTable>,
}

/// On-disk layout: `{"2024": {"standard_deductions": {..}, "tax_brackets": {..}}}`
#[derive(Debug, Deserialize)]
struct RawYearTable {
    standard_deductions: BTreeMap<String, Decimal>,
    tax_brackets: BTreeMap<String, Vec<Bracket>>,
}

impl TaxTable {
    /// Table bundled with the binary (published IRS figures)
    pub fn embedded() -> Result<Self, TaxError> {
        Self::from_json_str(EMBEDDED_TABLE)
    }

    pub fn from_path(path: &Path) -> Result<Self, TaxError> {
        let file = File::open(path).map_err(|e| {
            TaxError::Configuration(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_json_str(json: &str) -> Result<Self, TaxError> {
        Self::from_reader(json.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TaxError> {
        let raw: BTreeMap<String, RawYearTable> = serde_json::from_reader(reader)
            .map_err(|e| TaxError::Configuration(format!("malformed tax table: {e}")))?;

        if raw.is_empty() {
            return Err(TaxError::Configuration("tax table has no years".to_string()));
        }

        let mut years = BTreeMap::new();
        for (year_key, raw_year) in raw {
            let year = year_key
                .trim()
                .parse::<i32>()
                .map(TaxYear)
                .map_err(|_| TaxError::Configuration(format!("invalid year key '{year_key}'")))?;
            let year_table = YearTable::from_raw(year, raw_year)?;
            years.insert(year, year_table);
        }

        log::info!(
            "Loaded tax table for years {}",
            years
                .keys()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(TaxTable { years })
    }

    /// Years with an entry, ascending
    pub fn years(&self) -> impl Iterator<Item = TaxYear> + '_ {
        self.years.keys().copied()
    }

    /// Standard deduction and ordered brackets for one year and filing status
    pub fn lookup(
        &self,
        year: TaxYear,
        status: FilingStatus,
    ) -> Result<(Decimal, &[Bracket]), TaxError> {
        let year_table = self.years.get(&year).ok_or(TaxError::UnknownYear(year))?;
        let unknown = || TaxError::UnknownFilingStatus { year, status };
        let deduction = year_table
            .standard_deductions
            .get(&status)
            .copied()
            .ok_or_else(unknown)?;
        let brackets = year_table.tax_brackets.get(&status).ok_or_else(unknown)?;
        Ok((deduction, brackets.as_slice()))
    }
}

impl YearTable {
    fn from_raw(year: TaxYear, raw: RawYearTable) -> Result<Self, TaxError> {
        let parse_status = |key: &str| {
            key.parse::<FilingStatus>()
                .map_err(|e| TaxError::Configuration(format!("{year}: {e}")))
        };

        let mut standard_deductions = BTreeMap::new();
        for (key, amount) in raw.standard_deductions {
            let status = parse_status(&key)?;
            if amount < Decimal::ZERO {
                return Err(TaxError::Configuration(format!(
                    "{year} {status}: negative standard deduction {amount}"
                )));
            }
            standard_deductions.insert(status, amount);
        }

        let mut tax_brackets = BTreeMap::new();
        for (key, brackets) in raw.tax_brackets {
            let status = parse_status(&key)?;
            validate_brackets(&brackets)
                .map_err(|msg| TaxError::Configuration(format!("{year} {status}: {msg}")))?;
            tax_brackets.insert(status, brackets);
        }

        // Both halves must cover the same statuses, a status with only one of
        // them would compute garbage rather than fail.
        for status in standard_deductions.keys() {
            if !tax_brackets.contains_key(status) {
                return Err(TaxError::Configuration(format!(
                    "{year} {status}: standard deduction without brackets"
                )));
            }
        }
        for status in tax_brackets.keys() {
            if !standard_deductions.contains_key(status) {
                return Err(TaxError::Configuration(format!(
                    "{year} {status}: brackets without standard deduction"
                )));
            }
        }

        Ok(YearTable {
            standard_deductions,
            tax_brackets,
        })
    }
}

/// Brackets start at zero, are contiguous, end unbounded and never lower the rate.
fn validate_brackets(brackets: &[Bracket]) -> Result<(), String> {
    let first = brackets.first().ok_or("empty bracket schedule")?;
    if !first.min.is_zero() {
        return Err(format!("first bracket starts at {}, expected 0", first.min));
    }

    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(format!("bracket {i} rate {} outside [0, 1]", bracket.rate));
        }

        let is_last = i == brackets.len() - 1;
        match (bracket.max, is_last) {
            (None, true) => {}
            (None, false) => return Err(format!("bracket {i} is unbounded but not last")),
            (Some(_), true) => return Err("top bracket must be unbounded".to_string()),
            (Some(max), false) => {
                if max <= bracket.min {
                    return Err(format!("bracket {i} max {max} not above min {}", bracket.min));
                }
                let next = &brackets[i + 1];
                if next.min != max {
                    return Err(format!(
                        "bracket {} starts at {} but bracket {i} ends at {max}",
                        i + 1,
                        next.min
                    ));
                }
                if next.rate < bracket.rate {
                    return Err(format!("bracket {} lowers the rate", i + 1));
                }
            }
        }
    }
    Ok(())
}
