use super::us::FilingStatus;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Yes/no answer from the intake questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    #[serde(alias = "Yes", alias = "YES")]
    Yes,
    #[serde(alias = "No", alias = "NO")]
    No,
}

impl Answer {
    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

/// Spouse or dependent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub is_blind: Option<Answer>,
    /// Only recorded for dependents
    #[serde(default)]
    pub relationship: Option<String>,
}

impl Person {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Taxpayer details collected alongside the documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxpayerProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    /// Single line: "street [apt], city, ST zip"
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    /// Snake case key or the form label, e.g. "Married filing jointly"
    #[serde(default, deserialize_with = "filing_status_label")]
    pub filing_status: Option<FilingStatus>,
    #[serde(default)]
    pub is_blind: Option<Answer>,
    #[serde(default)]
    pub received_or_sold_digital_asset: Option<Answer>,
    #[serde(default)]
    pub spouse_info: Option<Person>,
    #[serde(default)]
    pub has_dependents: Option<Answer>,
    #[serde(default)]
    pub dependents: Vec<Person>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl TaxpayerProfile {
    /// Intake answers still needed before a return can be filed, as labels
    pub fn missing_fields(&self, today: NaiveDate) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.first_name) {
            missing.push("Taxpayer First Name");
        }
        if is_blank(&self.last_name) {
            missing.push("Taxpayer Last Name");
        }
        if is_blank(&self.ssn) {
            missing.push("Taxpayer SSN");
        }
        if is_blank(&self.address) {
            missing.push("Taxpayer Address");
        }
        if self.filing_status.is_none() {
            missing.push("Filing Status");
        }
        match self.date_of_birth {
            None => missing.push("Date of Birth"),
            Some(dob) if dob > today => missing.push("Date of Birth cannot be in the future"),
            Some(_) => {}
        }
        if self.is_blind.is_none() {
            missing.push("Are you blind?");
        }
        if self.received_or_sold_digital_asset.is_none() {
            missing.push("Digital Asset Question");
        }

        if self.filing_status.is_some_and(|s| s.has_spouse()) {
            let complete = self.spouse_info.as_ref().is_some_and(|spouse| {
                !is_blank(&spouse.first_name)
                    && !is_blank(&spouse.last_name)
                    && !is_blank(&spouse.ssn)
            });
            if !complete {
                missing.push("Spouse Information");
            }
        }

        if self.has_dependents.is_some_and(Answer::is_yes) && self.dependents.is_empty() {
            missing.push("Dependents Information");
        }
        missing
    }
}

fn filing_status_label<'de, D>(deserializer: D) -> Result<Option<FilingStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
