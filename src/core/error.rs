use super::us::{FilingStatus, TaxYear};

/// Failures of the tax computation. None of these are transient.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("tax table configuration error: {0}")]
    Configuration(String),
    #[error("no tax table entry for year {0}")]
    UnknownYear(TaxYear),
    #[error("no {status} entry in the {year} tax table")]
    UnknownFilingStatus { year: TaxYear, status: FilingStatus },
    #[error("taxpayer profile has no filing status")]
    MissingFilingStatus,
}
