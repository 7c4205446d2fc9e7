use super::documents::{
    AmountField, CompensationDocument, InterestDocument, TaxDocument, W2Document,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Income and withholding totals across every document of a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IncomeAggregate {
    pub wages: Decimal,
    pub interest_income: Decimal,
    pub self_employment_income: Decimal,
    pub gross_income: Decimal,
    pub total_withholding: Decimal,
}

/// Sum one amount field over a set of documents. Variants without the field add nothing.
pub fn sum_field<D: TaxDocument>(documents: &[D], field: AmountField) -> Decimal {
    documents
        .iter()
        .filter_map(|doc| doc.amount(field))
        .sum()
}

/// Aggregate income categories and federal withholding
pub fn aggregate(
    w2s: &[W2Document],
    ints: &[InterestDocument],
    necs: &[CompensationDocument],
) -> IncomeAggregate {
    let wages = sum_field(w2s, AmountField::Wages);
    let interest_income = sum_field(ints, AmountField::InterestIncome);
    let self_employment_income = sum_field(necs, AmountField::NonemployeeCompensation);

    let total_withholding = sum_field(w2s, AmountField::FederalTaxWithheld)
        + sum_field(ints, AmountField::FederalTaxWithheld)
        + sum_field(necs, AmountField::FederalTaxWithheld);

    IncomeAggregate {
        wages,
        interest_income,
        self_employment_income,
        gross_income: wages + interest_income + self_employment_income,
        total_withholding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    fn w2(wages: Decimal, withheld: Decimal) -> W2Document {
        W2Document {
            wages,
            federal_tax_withheld: withheld,
            ..Default::default()
        }
    }

    fn int(interest: Decimal, withheld: Decimal) -> InterestDocument {
        InterestDocument {
            interest_income: interest,
            federal_tax_withheld: withheld,
            ..Default::default()
        }
    }

    fn nec(comp: Decimal, withheld: Decimal) -> CompensationDocument {
        CompensationDocument {
            nonemployee_compensation: comp,
            federal_tax_withheld: withheld,
            ..Default::default()
        }
    }

    #[test]
    fn empty_inputs_aggregate_to_zero() {
        assert_eq!(aggregate(&[], &[], &[]), IncomeAggregate::default());
    }

    #[test]
    fn sums_each_category() {
        let agg = aggregate(
            &[w2(dec!(50000), dec!(4000)), w2(dec!(10000.50), dec!(900))],
            &[int(dec!(125.40), dec!(0))],
            &[nec(dec!(2500), dec!(100))],
        );
        assert_eq!(agg.wages, dec!(60000.50));
        assert_eq!(agg.interest_income, dec!(125.40));
        assert_eq!(agg.self_employment_income, dec!(2500));
        assert_eq!(agg.gross_income, dec!(62625.90));
        assert_eq!(agg.total_withholding, dec!(5000));
    }

    #[test]
    fn state_withholding_not_in_federal_total() {
        let mut doc = w2(dec!(1000), dec!(100));
        doc.state_tax_withheld = dec!(50);
        let agg = aggregate(&[doc.clone()], &[], &[]);
        assert_eq!(agg.total_withholding, dec!(100));
        assert_eq!(sum_field(&[doc], AmountField::StateTaxWithheld), dec!(50));
    }

    #[test]
    fn field_missing_from_variant_sums_to_zero() {
        assert_eq!(
            sum_field(&[w2(dec!(1000), dec!(0))], AmountField::InterestIncome),
            Decimal::ZERO
        );
    }

    proptest! {
        #[test]
        fn gross_income_independent_of_order(
            a in 0i64..10_000_000,
            b in 0i64..10_000_000,
            c in 0i64..10_000_000,
        ) {
            let docs = [
                w2(Decimal::new(a, 2), Decimal::ZERO),
                w2(Decimal::new(b, 2), Decimal::ZERO),
                w2(Decimal::new(c, 2), Decimal::ZERO),
            ];
            let reversed: Vec<_> = docs.iter().rev().cloned().collect();
            let forward = aggregate(&docs, &[], &[]);
            let backward = aggregate(&reversed, &[], &[]);
            prop_assert_eq!(forward.gross_income, backward.gross_income);
            prop_assert_eq!(forward, backward);
        }
    }
}
