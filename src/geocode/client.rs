use std::future::Future;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::Result,
    geocode::types::{AddressDocument, KeywordDocument, LookupResult, SearchResponse},
};

const ADDRESS_SEARCH_PATH: &str = "/v2/local/search/address.json";
const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";

/// The two remote lookups the cross-validator depends on.
///
/// Implementations swallow every failure and report it as
/// [`LookupResult::Unresolved`].
pub trait AddressLookup {
    /// Free-text address to its canonical road address.
    fn lookup_by_address(&self, address: &str) -> impl Future<Output = LookupResult> + Send;

    /// Keyword (place) search; yields the best match's road address.
    fn lookup_by_keyword(&self, query: &str) -> impl Future<Output = LookupResult> + Send;
}

/// Kakao Local REST client.
#[derive(Clone)]
pub struct KakaoLocalClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KakaoLocalClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("confirm-verify/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build a client from loaded configuration. Fails if no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::new(&api_key, &config.geocoder.base_url, config.request_timeout())
    }

    /// Issue one search request capped at a single candidate.
    async fn search<D: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> std::result::Result<Vec<D>, reqwest::Error> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(&[("query", query), ("size", "1")])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse<D> = response.json().await?;
        Ok(body.documents)
    }
}

impl AddressLookup for KakaoLocalClient {
    async fn lookup_by_address(&self, address: &str) -> LookupResult {
        if address.trim().is_empty() {
            return LookupResult::Unresolved;
        }

        match self.search::<AddressDocument>(ADDRESS_SEARCH_PATH, address).await {
            Ok(documents) => match documents.into_iter().next() {
                Some(doc) => doc.canonical_address(),
                None => {
                    debug!("Address search returned no candidates for '{}'", address);
                    LookupResult::Unresolved
                }
            },
            Err(e) => {
                warn!("Address search failed for '{}': {}", address, e);
                LookupResult::Unresolved
            }
        }
    }

    async fn lookup_by_keyword(&self, query: &str) -> LookupResult {
        if query.trim().is_empty() {
            return LookupResult::Unresolved;
        }

        match self.search::<KeywordDocument>(KEYWORD_SEARCH_PATH, query).await {
            Ok(documents) => match documents.into_iter().next() {
                Some(doc) => {
                    debug!("Keyword '{}' matched place {:?}", query, doc.place_name);
                    doc.road_address()
                }
                None => {
                    debug!("Keyword search returned no candidates for '{}'", query);
                    LookupResult::Unresolved
                }
            },
            Err(e) => {
                warn!("Keyword search failed for '{}': {}", query, e);
                LookupResult::Unresolved
            }
        }
    }
}
