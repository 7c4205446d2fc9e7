//! The tax return aggregate: one taxpayer's documents and running totals.

use super::documents::{
    AmountField, CompensationDocument, IncomeDocument, InterestDocument, W2Document,
};
use super::error::TaxError;
use super::income::sum_field;
use super::profile::TaxpayerProfile;
use super::summary::{build_summary, TaxSummary};
use super::table::TaxTable;
use super::us::TaxYear;
use rust_decimal::Decimal;
use serde::Serialize;

/// Running totals. Document sums always match the document lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub wages: Decimal,
    pub interest_income: Decimal,
    pub self_employment_income: Decimal,
    pub federal_tax_withheld: Decimal,
    pub state_tax_withheld: Decimal,
    /// Gross income; no adjustments are modelled
    pub agi: Decimal,
    /// Zero until [`TaxReturn::finalize`], reset by any change to the documents
    pub taxable_income: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxReturn {
    pub taxpayer: TaxpayerProfile,
    w2s: Vec<W2Document>,
    #[serde(rename = "1099ints")]
    ints: Vec<InterestDocument>,
    #[serde(rename = "1099necs")]
    necs: Vec<CompensationDocument>,
    totals: Totals,
}

impl TaxReturn {
    /// Empty return with zeroed totals
    pub fn new(taxpayer: TaxpayerProfile) -> Self {
        TaxReturn {
            taxpayer,
            ..Default::default()
        }
    }

    pub fn w2s(&self) -> &[W2Document] {
        &self.w2s
    }

    pub fn ints(&self) -> &[InterestDocument] {
        &self.ints
    }

    pub fn necs(&self) -> &[CompensationDocument] {
        &self.necs
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn document_count(&self) -> usize {
        self.w2s.len() + self.ints.len() + self.necs.len()
    }

    /// All documents, W-2s first, then 1099-INTs, then 1099-NECs
    pub fn documents(&self) -> impl Iterator<Item = IncomeDocument> + '_ {
        let w2s = self.w2s.iter().cloned().map(IncomeDocument::from);
        let ints = self.ints.iter().cloned().map(IncomeDocument::from);
        let necs = self.necs.iter().cloned().map(IncomeDocument::from);
        w2s.chain(ints).chain(necs)
    }

    /// Append a document and add its amounts to the totals.
    /// Resubmitting the same document counts it again.
    pub fn add_document(&mut self, document: impl Into<IncomeDocument>) {
        let totals = &mut self.totals;
        match document.into() {
            IncomeDocument::W2(doc) => {
                totals.wages += doc.wages;
                totals.federal_tax_withheld += doc.federal_tax_withheld;
                totals.state_tax_withheld += doc.state_tax_withheld;
                log::debug!("Added W-2 wages {}", doc.wages);
                self.w2s.push(doc);
            }
            IncomeDocument::Interest(doc) => {
                totals.interest_income += doc.interest_income;
                totals.federal_tax_withheld += doc.federal_tax_withheld;
                totals.state_tax_withheld += doc.state_tax_withheld;
                log::debug!("Added 1099-INT interest {}", doc.interest_income);
                self.ints.push(doc);
            }
            IncomeDocument::Compensation(doc) => {
                totals.self_employment_income += doc.nonemployee_compensation;
                totals.federal_tax_withheld += doc.federal_tax_withheld;
                totals.state_tax_withheld += doc.state_tax_withheld;
                log::debug!(
                    "Added 1099-NEC compensation {}",
                    doc.nonemployee_compensation
                );
                self.necs.push(doc);
            }
        }
        totals.agi = totals.wages + totals.interest_income + totals.self_employment_income;
        totals.taxable_income = Decimal::ZERO;
    }

    /// Rebuild the totals from the document lists
    pub fn recompute_totals(&mut self) {
        let wages = sum_field(&self.w2s, AmountField::Wages);
        let interest_income = sum_field(&self.ints, AmountField::InterestIncome);
        let self_employment_income = sum_field(&self.necs, AmountField::NonemployeeCompensation);

        let federal_tax_withheld = sum_field(&self.w2s, AmountField::FederalTaxWithheld)
            + sum_field(&self.ints, AmountField::FederalTaxWithheld)
            + sum_field(&self.necs, AmountField::FederalTaxWithheld);
        let state_tax_withheld = sum_field(&self.w2s, AmountField::StateTaxWithheld)
            + sum_field(&self.ints, AmountField::StateTaxWithheld)
            + sum_field(&self.necs, AmountField::StateTaxWithheld);

        self.totals = Totals {
            wages,
            interest_income,
            self_employment_income,
            federal_tax_withheld,
            state_tax_withheld,
            agi: wages + interest_income + self_employment_income,
            taxable_income: Decimal::ZERO,
        };
    }

    /// Compute the summary and record its taxable income in the totals
    pub fn finalize(&mut self, table: &TaxTable, year: TaxYear) -> Result<TaxSummary, TaxError> {
        let summary = build_summary(self, table, year)?;
        self.totals.taxable_income = summary.taxable_income;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert_eq, prop_oneof, proptest, Just, Strategy};
    use rust_decimal_macros::dec;

    fn w2(wages: Decimal, fed: Decimal, state: Decimal) -> W2Document {
        W2Document {
            wages,
            federal_tax_withheld: fed,
            state_tax_withheld: state,
            ..Default::default()
        }
    }

    #[test]
    fn new_return_is_zeroed() {
        let tax_return = TaxReturn::new(TaxpayerProfile::default());
        assert_eq!(*tax_return.totals(), Totals::default());
        assert_eq!(tax_return.document_count(), 0);
    }

    #[test]
    fn each_variant_updates_its_fields() {
        let mut tax_return = TaxReturn::default();
        tax_return.add_document(w2(dec!(60000), dec!(5000), dec!(1200)));
        tax_return.add_document(InterestDocument {
            interest_income: dec!(250.75),
            federal_tax_withheld: dec!(10),
            state_tax_withheld: dec!(2),
            ..Default::default()
        });
        tax_return.add_document(CompensationDocument {
            nonemployee_compensation: dec!(3000),
            federal_tax_withheld: dec!(0),
            state_tax_withheld: dec!(90),
            state_income: dec!(3000),
            ..Default::default()
        });

        let totals = tax_return.totals();
        assert_eq!(totals.wages, dec!(60000));
        assert_eq!(totals.interest_income, dec!(250.75));
        assert_eq!(totals.self_employment_income, dec!(3000));
        assert_eq!(totals.federal_tax_withheld, dec!(5010));
        assert_eq!(totals.state_tax_withheld, dec!(1292));
        assert_eq!(totals.agi, dec!(63250.75));
        assert_eq!(tax_return.document_count(), 3);
    }

    #[test]
    fn duplicates_are_counted_twice() {
        let mut tax_return = TaxReturn::default();
        let doc = w2(dec!(1000), dec!(100), dec!(0));
        tax_return.add_document(doc.clone());
        tax_return.add_document(doc);
        assert_eq!(tax_return.w2s().len(), 2);
        assert_eq!(tax_return.totals().wages, dec!(2000));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut tax_return = TaxReturn::default();
        tax_return.add_document(w2(dec!(1000.10), dec!(100), dec!(5)));
        tax_return.recompute_totals();
        let once = *tax_return.totals();
        tax_return.recompute_totals();
        assert_eq!(*tax_return.totals(), once);
    }

    #[test]
    fn adding_after_finalize_resets_taxable_income() {
        let table = TaxTable::embedded().unwrap();
        let mut tax_return = TaxReturn::new(TaxpayerProfile {
            filing_status: Some(crate::core::FilingStatus::Single),
            ..Default::default()
        });
        tax_return.add_document(w2(dec!(60000), dec!(5000), dec!(0)));
        let summary = tax_return.finalize(&table, TaxYear(2024)).unwrap();
        assert_eq!(tax_return.totals().taxable_income, summary.taxable_income);
        assert_eq!(summary.taxable_income, dec!(45400.00));

        tax_return.add_document(w2(dec!(1), dec!(0), dec!(0)));
        assert_eq!(tax_return.totals().taxable_income, Decimal::ZERO);
    }

    #[test]
    fn documents_iterates_all_variants() {
        let mut tax_return = TaxReturn::default();
        tax_return.add_document(CompensationDocument::default());
        tax_return.add_document(w2(dec!(1), dec!(0), dec!(0)));
        let kinds: Vec<_> = tax_return.documents().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                crate::core::DocumentKind::W2,
                crate::core::DocumentKind::Nec1099
            ]
        );
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..50_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    fn any_document() -> impl Strategy<Value = IncomeDocument> {
        prop_oneof![
            (cents(), cents(), cents()).prop_map(|(w, f, s)| IncomeDocument::from(w2(w, f, s))),
            (cents(), cents(), cents()).prop_map(|(i, f, s)| IncomeDocument::from(InterestDocument {
                interest_income: i,
                federal_tax_withheld: f,
                state_tax_withheld: s,
                ..Default::default()
            })),
            (cents(), cents(), cents()).prop_map(|(n, f, s)| IncomeDocument::from(
                CompensationDocument {
                    nonemployee_compensation: n,
                    federal_tax_withheld: f,
                    state_tax_withheld: s,
                    ..Default::default()
                }
            )),
            Just(IncomeDocument::from(W2Document::default())),
        ]
    }

    proptest! {
        #[test]
        fn incremental_totals_match_recompute(docs in vec(any_document(), 0..20)) {
            let mut tax_return = TaxReturn::default();
            for doc in docs {
                tax_return.add_document(doc);
            }
            let incremental = *tax_return.totals();
            tax_return.recompute_totals();
            prop_assert_eq!(incremental, *tax_return.totals());
            // Decimal equality ignores scale, compare the printed form too
            prop_assert_eq!(
                format!("{:?}", incremental),
                format!("{:?}", tax_return.totals())
            );
        }
    }
}
