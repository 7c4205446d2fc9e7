//! Progressive bracket tax.
//!
//! A bracket taxes the part of income strictly above its `min`, capped at its
//! `max` (inclusive). Income exactly at a bracket's `max` is therefore taxed
//! entirely inside that bracket. Nothing is rounded here.

use super::table::Bracket;
use rust_decimal::Decimal;

/// Portion of income taxed in one bracket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSlice {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// Income falling into each bracket. Brackets above the income are omitted.
pub fn bracket_breakdown(taxable_income: Decimal, brackets: &[Bracket]) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    if taxable_income <= Decimal::ZERO {
        return slices;
    }

    for bracket in brackets {
        if taxable_income <= bracket.min {
            break;
        }
        let upper = match bracket.max {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        let taxed_amount = upper - bracket.min;
        let tax = taxed_amount * bracket.rate;

        log::debug!(
            "Bracket {}-{} @ {}: {} taxed, {} tax",
            bracket.min,
            bracket.max.map_or("".to_string(), |m| m.to_string()),
            bracket.rate,
            taxed_amount,
            tax
        );

        slices.push(BracketSlice {
            min: bracket.min,
            max: bracket.max,
            rate: bracket.rate,
            taxed_amount,
            tax,
        });
    }
    slices
}

/// Tax owed on `taxable_income` under a bracket schedule
pub fn compute_tax(taxable_income: Decimal, brackets: &[Bracket]) -> Decimal {
    bracket_breakdown(taxable_income, brackets)
        .iter()
        .map(|slice| slice.tax)
        .sum()
}

/// Rate applied to the last dollar of income, zero when there is no taxable income
pub fn marginal_rate(taxable_income: Decimal, brackets: &[Bracket]) -> Decimal {
    bracket_breakdown(taxable_income, brackets)
        .last()
        .map_or(Decimal::ZERO, |slice| slice.rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    fn bracket(min: Decimal, max: Option<Decimal>, rate: Decimal) -> Bracket {
        Bracket { min, max, rate }
    }

    /// 2024 single filer schedule
    fn schedule() -> Vec<Bracket> {
        vec![
            bracket(dec!(0), Some(dec!(11600)), dec!(0.10)),
            bracket(dec!(11600), Some(dec!(47150)), dec!(0.12)),
            bracket(dec!(47150), Some(dec!(100525)), dec!(0.22)),
            bracket(dec!(100525), Some(dec!(191950)), dec!(0.24)),
            bracket(dec!(191950), Some(dec!(243725)), dec!(0.32)),
            bracket(dec!(243725), Some(dec!(609350)), dec!(0.35)),
            bracket(dec!(609350), None, dec!(0.37)),
        ]
    }

    #[test]
    fn zero_and_negative_income_owe_nothing() {
        assert_eq!(compute_tax(Decimal::ZERO, &schedule()), Decimal::ZERO);
        assert_eq!(compute_tax(dec!(-500), &schedule()), Decimal::ZERO);
        assert!(bracket_breakdown(dec!(-500), &schedule()).is_empty());
    }

    #[test]
    fn income_within_first_bracket() {
        assert_eq!(compute_tax(dec!(10000), &schedule()), dec!(1000));
    }

    #[test]
    fn income_spanning_brackets() {
        // 1160 + 0.12 * 35550 + 0.22 * 2850
        assert_eq!(compute_tax(dec!(50000), &schedule()), dec!(6053));
    }

    #[test]
    fn income_at_bracket_max_stays_in_bracket() {
        let slices = bracket_breakdown(dec!(11600), &schedule());
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].taxed_amount, dec!(11600));
        assert_eq!(compute_tax(dec!(11600), &schedule()), dec!(1160));
        assert_eq!(marginal_rate(dec!(11600), &schedule()), dec!(0.10));
    }

    #[test]
    fn one_cent_above_max_enters_next_bracket() {
        let slices = bracket_breakdown(dec!(11600.01), &schedule());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].taxed_amount, dec!(0.01));
        assert_eq!(compute_tax(dec!(11600.01), &schedule()), dec!(1160.0012));
        assert_eq!(marginal_rate(dec!(11600.01), &schedule()), dec!(0.12));
    }

    #[test]
    fn top_bracket_is_unbounded() {
        let tax = compute_tax(dec!(1000000), &schedule());
        let below_top = compute_tax(dec!(609350), &schedule());
        assert_eq!(tax, below_top + dec!(390650) * dec!(0.37));
        assert_eq!(marginal_rate(dec!(1000000), &schedule()), dec!(0.37));
    }

    #[test]
    fn no_intermediate_rounding() {
        // 0.10 * 0.05 keeps its full precision
        assert_eq!(compute_tax(dec!(0.05), &schedule()), dec!(0.005));
    }

    #[test]
    fn empty_schedule_owes_nothing() {
        assert_eq!(compute_tax(dec!(5000), &[]), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn tax_is_non_decreasing(a in 0i64..100_000_000, b in 0i64..100_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Decimal::new(lo, 2);
            let hi = Decimal::new(hi, 2);
            prop_assert!(compute_tax(lo, &schedule()) <= compute_tax(hi, &schedule()));
        }

        #[test]
        fn tax_is_continuous(cents in 0i64..100_000_000) {
            // One cent more income adds at most one cent times the top rate
            let income = Decimal::new(cents, 2);
            let step = compute_tax(income + dec!(0.01), &schedule()) - compute_tax(income, &schedule());
            prop_assert!(step >= Decimal::ZERO);
            prop_assert!(step <= dec!(0.01) * dec!(0.37));
        }

        #[test]
        fn top_bracket_is_linear(extra in 0i64..1_000_000_000) {
            let schedule = schedule();
            let top = schedule.last().unwrap();
            let income = top.min + Decimal::new(extra, 2);
            prop_assert_eq!(
                compute_tax(income, &schedule),
                compute_tax(top.min, &schedule) + (income - top.min) * top.rate
            );
        }

        #[test]
        fn non_positive_income_is_untaxed(cents in -100_000_000i64..=0) {
            prop_assert_eq!(compute_tax(Decimal::new(cents, 2), &schedule()), Decimal::ZERO);
        }
    }
}
