use serde::{Deserialize, Serialize};

/// Outcome of a single geocoding query.
///
/// Every failure cause (timeout, HTTP error, bad payload, no candidates)
/// maps to `Unresolved`; callers never see why a lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "address", rename_all = "snake_case")]
pub enum LookupResult {
    Resolved(String),
    Unresolved,
}

impl LookupResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupResult::Resolved(_))
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            LookupResult::Resolved(address) => Some(address),
            LookupResult::Unresolved => None,
        }
    }
}

impl From<Option<String>> for LookupResult {
    fn from(value: Option<String>) -> Self {
        match value.map(|s| s.trim().to_string()) {
            Some(address) if !address.is_empty() => LookupResult::Resolved(address),
            _ => LookupResult::Unresolved,
        }
    }
}

/// Envelope shared by the Kakao Local search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<D> {
    #[serde(default = "Vec::new")]
    pub documents: Vec<D>,
}

/// Candidate from `/v2/local/search/address.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressDocument {
    #[serde(default)]
    pub address_name: Option<String>,
    #[serde(default)]
    pub road_address: Option<RoadAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoadAddress {
    #[serde(default)]
    pub address_name: Option<String>,
}

impl AddressDocument {
    /// Road-name form when present, otherwise the generic address.
    pub fn canonical_address(self) -> LookupResult {
        let road = self
            .road_address
            .and_then(|road| road.address_name)
            .filter(|name| !name.trim().is_empty());
        LookupResult::from(road.or(self.address_name))
    }
}

/// Candidate from `/v2/local/search/keyword.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordDocument {
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub road_address_name: Option<String>,
}

impl KeywordDocument {
    pub fn road_address(self) -> LookupResult {
        LookupResult::from(self.road_address_name)
    }
}
