use tracing::debug;

use crate::{
    geocode::AddressLookup,
    verify::{similarity, types::CrossValidation},
};

/// Two-stage address check for a single company.
///
/// The ledger address is standardized through the address search, and a
/// second address is found independently through a keyword search on the
/// company name, scoped by the ledger's city. A company whose name resolves
/// to an unrelated branch in another city scores low instead of passing.
pub struct CrossValidator<L> {
    lookup: L,
}

impl<L: AddressLookup> CrossValidator<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub async fn validate(
        &self,
        company_name: &str,
        branch_name: &str,
        ledger_address: &str,
    ) -> CrossValidation {
        let standardized_address = self.lookup.lookup_by_address(ledger_address).await;

        let query = search_query(city_hint(ledger_address), company_name, branch_name);
        let verified_address = self.lookup.lookup_by_keyword(&query).await;

        let similarity_score = match (standardized_address.address(), verified_address.address()) {
            (Some(standardized), Some(verified)) => similarity::score(standardized, verified),
            _ => 0,
        };

        debug!(
            "{}: standardized={:?} verified={:?} score={}",
            company_name, standardized_address, verified_address, similarity_score
        );

        CrossValidation {
            standardized_address,
            verified_address,
            similarity_score,
        }
    }
}

/// First whitespace-delimited token of the ledger address.
pub fn city_hint(ledger_address: &str) -> &str {
    ledger_address.split_whitespace().next().unwrap_or("")
}

pub fn search_query(city_hint: &str, company_name: &str, branch_name: &str) -> String {
    format!("{} {} {}", city_hint, company_name, branch_name)
        .trim()
        .to_string()
}
