use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// IRS filing status, selects the standard deduction and bracket schedule
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::MarriedFilingSeparately,
        FilingStatus::HeadOfHousehold,
        FilingStatus::QualifyingSurvivingSpouse,
    ];

    /// Identifier used in tax table files and return input
    pub fn key(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "married_filing_jointly",
            FilingStatus::MarriedFilingSeparately => "married_filing_separately",
            FilingStatus::HeadOfHousehold => "head_of_household",
            FilingStatus::QualifyingSurvivingSpouse => "qualifying_surviving_spouse",
        }
    }

    /// Label as printed on Form 1040
    pub fn label(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedFilingJointly => "Married filing jointly",
            FilingStatus::MarriedFilingSeparately => "Married filing separately",
            FilingStatus::HeadOfHousehold => "Head of household",
            FilingStatus::QualifyingSurvivingSpouse => "Qualifying surviving spouse",
        }
    }

    /// Whether the return carries spouse details
    pub fn has_spouse(&self) -> bool {
        matches!(
            self,
            FilingStatus::MarriedFilingJointly | FilingStatus::MarriedFilingSeparately
        )
    }
}

impl FromStr for FilingStatus {
    type Err = String;

    /// Accepts both table keys ("head_of_household") and form labels ("Head of household")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        FilingStatus::ALL
            .into_iter()
            .find(|status| status.key() == normalized)
            .ok_or_else(|| format!("unknown filing status: {s}"))
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// US tax year (calendar year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Latest birth date that counts as age 65 or older for this year.
    /// A taxpayer is considered 65 on the day before their 65th birthday,
    /// so anyone born on or before January 2 of `year - 64` qualifies.
    pub fn senior_birth_cutoff(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 64, 1, 2)
    }

    pub fn is_senior(&self, date_of_birth: NaiveDate) -> bool {
        self.senior_birth_cutoff()
            .is_some_and(|cutoff| date_of_birth <= cutoff)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filing_status_from_key() {
        assert_eq!("single".parse(), Ok(FilingStatus::Single));
        assert_eq!(
            "qualifying_surviving_spouse".parse(),
            Ok(FilingStatus::QualifyingSurvivingSpouse)
        );
    }

    #[test]
    fn filing_status_from_label() {
        assert_eq!(
            "Married filing jointly".parse(),
            Ok(FilingStatus::MarriedFilingJointly)
        );
        assert_eq!("Head of household".parse(), Ok(FilingStatus::HeadOfHousehold));
        assert!("widowed".parse::<FilingStatus>().is_err());
    }

    #[test]
    fn filing_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&FilingStatus::MarriedFilingSeparately).unwrap();
        assert_eq!(json, "\"married_filing_separately\"");
        let status: FilingStatus = serde_json::from_str("\"head_of_household\"").unwrap();
        assert_eq!(status, FilingStatus::HeadOfHousehold);
    }

    #[test]
    fn spouse_statuses() {
        assert!(FilingStatus::MarriedFilingJointly.has_spouse());
        assert!(FilingStatus::MarriedFilingSeparately.has_spouse());
        assert!(!FilingStatus::Single.has_spouse());
        assert!(!FilingStatus::QualifyingSurvivingSpouse.has_spouse());
    }

    #[test]
    fn senior_cutoff_2024() {
        let ty = TaxYear(2024);
        assert_eq!(ty.senior_birth_cutoff(), NaiveDate::from_ymd_opt(1960, 1, 2));
        assert!(ty.is_senior(NaiveDate::from_ymd_opt(1960, 1, 2).unwrap()));
        assert!(!ty.is_senior(NaiveDate::from_ymd_opt(1960, 1, 3).unwrap()));
    }

    #[test]
    fn tax_year_display() {
        assert_eq!(TaxYear(2024).to_string(), "2024");
    }
}
