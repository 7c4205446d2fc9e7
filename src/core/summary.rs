use super::brackets::{bracket_breakdown, compute_tax, marginal_rate, BracketSlice};
use super::error::TaxError;
use super::income::{aggregate, IncomeAggregate};
use super::table::{Bracket, TaxTable};
use super::tax_return::TaxReturn;
use super::us::{FilingStatus, TaxYear};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Final figures handed to the form filler. Every amount has two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    #[serde(skip)]
    pub year: TaxYear,
    #[serde(skip)]
    pub filing_status: FilingStatus,
    pub gross_income: Decimal,
    pub wages: Decimal,
    pub interest_income: Decimal,
    pub self_employment_income: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,
    pub tax_owed: Decimal,
    pub federal_tax_withheld: Decimal,
    /// Positive is a refund, negative is an amount owed
    pub refund_or_amount_due: Decimal,
}

impl TaxSummary {
    pub fn is_refund(&self) -> bool {
        self.refund_or_amount_due > Decimal::ZERO
    }
}

/// Round a currency amount to cents, halves away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Always carry two decimal places so output reads 1100.00 rather than 1100
    rounded.rescale(2);
    rounded
}

/// Unrounded figures shared by the summary and its bracket detail
struct Assessment<'t> {
    filing_status: FilingStatus,
    standard_deduction: Decimal,
    brackets: &'t [Bracket],
    income: IncomeAggregate,
    taxable_income: Decimal,
}

fn assess<'t>(
    tax_return: &TaxReturn,
    table: &'t TaxTable,
    year: TaxYear,
) -> Result<Assessment<'t>, TaxError> {
    let filing_status = tax_return
        .taxpayer
        .filing_status
        .ok_or(TaxError::MissingFilingStatus)?;
    let (standard_deduction, brackets) = table.lookup(year, filing_status)?;

    let income = aggregate(tax_return.w2s(), tax_return.ints(), tax_return.necs());
    let taxable_income = (income.gross_income - standard_deduction).max(Decimal::ZERO);
    Ok(Assessment {
        filing_status,
        standard_deduction,
        brackets,
        income,
        taxable_income,
    })
}

/// Compute the tax summary of a return for one year
pub fn build_summary(
    tax_return: &TaxReturn,
    table: &TaxTable,
    year: TaxYear,
) -> Result<TaxSummary, TaxError> {
    let Assessment {
        filing_status,
        standard_deduction,
        brackets,
        income,
        taxable_income,
    } = assess(tax_return, table, year)?;
    let tax_owed = compute_tax(taxable_income, brackets);

    log::info!(
        "{} {}: gross {}, taxable {}, tax {}, withheld {}",
        year,
        filing_status,
        income.gross_income,
        taxable_income,
        tax_owed,
        income.total_withholding
    );

    let tax_owed = round_currency(tax_owed);
    let federal_tax_withheld = round_currency(income.total_withholding);

    Ok(TaxSummary {
        year,
        filing_status,
        gross_income: round_currency(income.gross_income),
        wages: round_currency(income.wages),
        interest_income: round_currency(income.interest_income),
        self_employment_income: round_currency(income.self_employment_income),
        standard_deduction: round_currency(standard_deduction),
        taxable_income: round_currency(taxable_income),
        tax_owed,
        federal_tax_withheld,
        // From the rounded figures, so withheld - tax_owed matches exactly
        refund_or_amount_due: federal_tax_withheld - tax_owed,
    })
}

/// Per-bracket tax of a return, unrounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketDetail {
    pub slices: Vec<BracketSlice>,
    pub marginal_rate: Decimal,
}

/// Bracket walk over the same taxable income [`build_summary`] taxes
pub fn bracket_detail(
    tax_return: &TaxReturn,
    table: &TaxTable,
    year: TaxYear,
) -> Result<BracketDetail, TaxError> {
    let assessment = assess(tax_return, table, year)?;
    Ok(BracketDetail {
        slices: bracket_breakdown(assessment.taxable_income, assessment.brackets),
        marginal_rate: marginal_rate(assessment.taxable_income, assessment.brackets),
    })
}
