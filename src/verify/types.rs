use serde::{Deserialize, Serialize};
use crate::geocode::LookupResult;

/// One company row from the input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based spreadsheet row (header is row 1)
    pub row_number: usize,
    pub company_name: String,
    /// Empty when the table has no branch column or the cell is blank
    pub branch_name: String,
    pub ledger_address: String,
}

impl Record {
    pub fn new(row_number: usize, company_name: &str, branch_name: &str, ledger_address: &str) -> Self {
        Self {
            row_number,
            company_name: company_name.trim().to_string(),
            branch_name: branch_name.trim().to_string(),
            ledger_address: ledger_address.trim().to_string(),
        }
    }
}

/// Binary verdict for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Match,
    NeedsReview,
}

impl Verdict {
    /// `Match` only when both lookups resolved and the score reaches `threshold`.
    pub fn classify(validation: &CrossValidation, threshold: u8) -> Self {
        if validation.is_fully_resolved() && validation.similarity_score >= threshold {
            Verdict::Match
        } else {
            Verdict::NeedsReview
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Match => "✅ 일치",
            Verdict::NeedsReview => "🚨 확인",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Match => write!(f, "Match"),
            Verdict::NeedsReview => write!(f, "NeedsReview"),
        }
    }
}

/// Raw result of the two-stage lookup for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub standardized_address: LookupResult,
    pub verified_address: LookupResult,
    pub similarity_score: u8,
}

impl CrossValidation {
    pub fn unresolved() -> Self {
        Self {
            standardized_address: LookupResult::Unresolved,
            verified_address: LookupResult::Unresolved,
            similarity_score: 0,
        }
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.standardized_address.is_resolved() && self.verified_address.is_resolved()
    }
}

/// Final per-record result, in input order within a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub row_number: usize,
    pub company_name: String,
    pub branch_name: String,
    pub ledger_address: String,
    pub standardized_address: LookupResult,
    pub verified_address: LookupResult,
    pub similarity_score: u8,
    pub verdict: Verdict,
    pub electronic_eligible: bool,
}

impl ValidationOutcome {
    pub fn new(record: &Record, validation: CrossValidation, threshold: u8, electronic_eligible: bool) -> Self {
        let verdict = Verdict::classify(&validation, threshold);
        Self {
            row_number: record.row_number,
            company_name: record.company_name.clone(),
            branch_name: record.branch_name.clone(),
            ledger_address: record.ledger_address.clone(),
            standardized_address: validation.standardized_address,
            verified_address: validation.verified_address,
            similarity_score: validation.similarity_score,
            verdict,
            electronic_eligible,
        }
    }

    pub fn has_unresolved_lookup(&self) -> bool {
        !self.standardized_address.is_resolved() || !self.verified_address.is_resolved()
    }
}
