//! Typed income documents as handed over by the extractors.
//!
//! Numeric fields default to zero when absent or null. String amounts such as
//! `"$1,234.56"` are cleaned; anything unparseable counts as zero.

use fedtax_derive::FieldSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Description of one input field, generated by `#[derive(FieldSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentField {
    pub name: &'static str,
    /// Alternative input name, empty if none
    pub alias: &'static str,
    /// `amount` or `text`
    pub kind: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DocumentKind {
    W2,
    Int1099,
    Nec1099,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::W2 => "W-2",
            DocumentKind::Int1099 => "1099-INT",
            DocumentKind::Nec1099 => "1099-NEC",
        }
    }

    pub fn field_schema(&self) -> &'static [DocumentField] {
        match self {
            DocumentKind::W2 => W2Document::field_schema(),
            DocumentKind::Int1099 => InterestDocument::field_schema(),
            DocumentKind::Nec1099 => CompensationDocument::field_schema(),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Numeric fields a document may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Wages,
    InterestIncome,
    NonemployeeCompensation,
    FederalTaxWithheld,
    StateTaxWithheld,
    StateIncome,
}

/// Common access to the amounts of any document variant
pub trait TaxDocument {
    const KIND: DocumentKind;

    /// `None` when this variant has no such field
    fn amount(&self, field: AmountField) -> Option<Decimal>;

    /// Whether any identifying metadata survived extraction
    fn has_identity(&self) -> bool;

    fn source_file(&self) -> Option<&str>;
}

/// Form W-2, Wage and Tax Statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
pub struct W2Document {
    /// Uploaded file the fields were read from
    #[serde(default)]
    pub source_file: Option<String>,
    /// Employee first name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Employee last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Box a: employee social security number
    #[serde(default)]
    pub ssn: Option<String>,
    /// Employee address
    #[serde(default)]
    pub address: Option<String>,
    /// Box c: employer name
    #[serde(default)]
    pub employer_name: Option<String>,
    /// Box b: employer identification number
    #[serde(default)]
    pub employer_ein: Option<String>,
    /// Box 1: wages, tips, other compensation
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub wages: Decimal,
    /// Box 2: federal income tax withheld
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub federal_tax_withheld: Decimal,
    /// Box 17: state income tax
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub state_tax_withheld: Decimal,
}

/// Form 1099-INT, Interest Income
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
pub struct InterestDocument {
    /// Uploaded file the fields were read from
    #[serde(default)]
    pub source_file: Option<String>,
    /// Payer name
    #[serde(default)]
    pub payer_name: Option<String>,
    /// Payer TIN
    #[serde(default)]
    pub payer_tin: Option<String>,
    /// Recipient TIN
    #[serde(default)]
    pub recipient_tin: Option<String>,
    /// Recipient name
    #[serde(default)]
    pub recipient_name: Option<String>,
    /// Box 1: interest income
    #[serde(
        default,
        alias = "box1_interest_income",
        deserialize_with = "amount_or_zero"
    )]
    #[schemars(with = "Option<f64>")]
    pub interest_income: Decimal,
    /// Box 4: federal income tax withheld
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub federal_tax_withheld: Decimal,
    /// Box 17: state tax withheld
    #[serde(
        default,
        alias = "box17_state_tax_withheld",
        deserialize_with = "amount_or_zero"
    )]
    #[schemars(with = "Option<f64>")]
    pub state_tax_withheld: Decimal,
}

/// Form 1099-NEC, Nonemployee Compensation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
pub struct CompensationDocument {
    /// Uploaded file the fields were read from
    #[serde(default)]
    pub source_file: Option<String>,
    /// Payer name
    #[serde(default)]
    pub payer_name: Option<String>,
    /// Recipient street and city
    #[serde(default)]
    pub recipient_address: Option<String>,
    /// Box 1: nonemployee compensation
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub nonemployee_compensation: Decimal,
    /// Box 4: federal income tax withheld
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub federal_tax_withheld: Decimal,
    /// Box 5: state tax withheld
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub state_tax_withheld: Decimal,
    /// Box 7: state income
    #[serde(default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub state_income: Decimal,
}

impl TaxDocument for W2Document {
    const KIND: DocumentKind = DocumentKind::W2;

    fn amount(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::Wages => Some(self.wages),
            AmountField::FederalTaxWithheld => Some(self.federal_tax_withheld),
            AmountField::StateTaxWithheld => Some(self.state_tax_withheld),
            _ => None,
        }
    }

    fn has_identity(&self) -> bool {
        self.ssn.is_some() || self.employer_ein.is_some() || self.employer_name.is_some()
    }

    fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }
}

impl TaxDocument for InterestDocument {
    const KIND: DocumentKind = DocumentKind::Int1099;

    fn amount(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::InterestIncome => Some(self.interest_income),
            AmountField::FederalTaxWithheld => Some(self.federal_tax_withheld),
            AmountField::StateTaxWithheld => Some(self.state_tax_withheld),
            _ => None,
        }
    }

    fn has_identity(&self) -> bool {
        self.payer_name.is_some() || self.payer_tin.is_some()
    }

    fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }
}

impl TaxDocument for CompensationDocument {
    const KIND: DocumentKind = DocumentKind::Nec1099;

    fn amount(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::NonemployeeCompensation => Some(self.nonemployee_compensation),
            AmountField::FederalTaxWithheld => Some(self.federal_tax_withheld),
            AmountField::StateTaxWithheld => Some(self.state_tax_withheld),
            AmountField::StateIncome => Some(self.state_income),
            _ => None,
        }
    }

    fn has_identity(&self) -> bool {
        self.payer_name.is_some()
    }

    fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }
}

/// Any one of the supported documents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IncomeDocument {
    W2(W2Document),
    Interest(InterestDocument),
    Compensation(CompensationDocument),
}

impl IncomeDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            IncomeDocument::W2(_) => DocumentKind::W2,
            IncomeDocument::Interest(_) => DocumentKind::Int1099,
            IncomeDocument::Compensation(_) => DocumentKind::Nec1099,
        }
    }

    /// Content hash, identical submissions share a fingerprint
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind().label().as_bytes());
        // Serializing plain structs of strings and decimals cannot fail
        if let Ok(bytes) = serde_json::to_vec(self) {
            hasher.update(&bytes);
        }
        hex::encode(hasher.finalize())
    }
}

impl From<W2Document> for IncomeDocument {
    fn from(doc: W2Document) -> Self {
        IncomeDocument::W2(doc)
    }
}

impl From<InterestDocument> for IncomeDocument {
    fn from(doc: InterestDocument) -> Self {
        IncomeDocument::Interest(doc)
    }
}

impl From<CompensationDocument> for IncomeDocument {
    fn from(doc: CompensationDocument) -> Self {
        IncomeDocument::Compensation(doc)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(Decimal),
    Text(String),
}

/// Largest amount accepted on input. Sums of many such amounts stay far inside
/// the range of `Decimal`.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

fn amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<RawAmount>::deserialize(deserializer) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Unreadable amount ({}), using 0", e);
            None
        }
    };
    let amount = match raw {
        Some(RawAmount::Number(n)) => n,
        Some(RawAmount::Text(s)) => parse_amount(&s),
        None => Decimal::ZERO,
    };
    if amount.abs() > MAX_AMOUNT {
        return Err(D::Error::custom(format!(
            "amount {} is out of range (limit {})",
            amount, MAX_AMOUNT
        )));
    }
    Ok(amount)
}

/// Parse a printed amount, dropping `$`, `,` and whitespace. Invalid input is zero.
pub fn parse_amount(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned).unwrap_or_else(|_| {
        log::debug!("Unparseable amount '{}', using 0", s);
        Decimal::ZERO
    })
}
