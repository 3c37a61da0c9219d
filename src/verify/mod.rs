pub mod batch;
pub mod eligibility;
pub mod similarity;
pub mod types;
pub mod validator;

#[cfg(test)]
pub(crate) mod fake;

pub use batch::{BatchReport, BatchRunner, BatchSummary};
pub use eligibility::EligibilitySet;
pub use types::{CrossValidation, Record, ValidationOutcome, Verdict};
pub use validator::CrossValidator;
