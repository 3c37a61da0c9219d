use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::geocode::{AddressLookup, LookupResult};

/// In-memory `AddressLookup` used by the validator and batch tests.
#[derive(Default)]
pub(crate) struct FakeLookup {
    addresses: HashMap<String, String>,
    keywords: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    panic_on: Option<String>,
    pub keyword_queries: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn with_address(mut self, query: &str, address: &str) -> Self {
        self.addresses.insert(query.to_string(), address.to_string());
        self
    }

    pub fn with_keyword(mut self, query: &str, address: &str) -> Self {
        self.keywords.insert(query.to_string(), address.to_string());
        self
    }

    /// Delay the address lookup for `query`.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn panicking_on(mut self, query: &str) -> Self {
        self.panic_on = Some(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.keyword_queries.lock().unwrap().clone()
    }
}

impl AddressLookup for FakeLookup {
    async fn lookup_by_address(&self, address: &str) -> LookupResult {
        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        if self.panic_on.as_deref() == Some(address) {
            panic!("lookup failed hard for {}", address);
        }
        LookupResult::from(self.addresses.get(address).cloned())
    }

    async fn lookup_by_keyword(&self, query: &str) -> LookupResult {
        self.keyword_queries.lock().unwrap().push(query.to_string());
        LookupResult::from(self.keywords.get(query).cloned())
    }
}
