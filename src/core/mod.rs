pub mod brackets;
pub mod documents;
pub mod error;
pub mod income;
pub mod input;
pub mod profile;
pub mod summary;
pub mod table;
pub mod tax_return;
pub mod us;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use brackets::{compute_tax, BracketSlice};
pub use documents::{
    AmountField, CompensationDocument, DocumentField, DocumentKind, IncomeDocument,
    InterestDocument, TaxDocument, W2Document,
};
pub use error::TaxError;
pub use income::{aggregate, sum_field, IncomeAggregate};
pub use input::{build_return, read_return_json, Extracted, ReturnInput};
pub use profile::{Answer, Person, TaxpayerProfile};
pub use summary::{bracket_detail, build_summary, round_currency, TaxSummary};
pub use table::{Bracket, TaxTable};
pub use tax_return::{TaxReturn, Totals};
pub use us::{FilingStatus, TaxYear};
pub use warnings::Warning;
