pub mod client;
pub mod types;

pub use client::{AddressLookup, KakaoLocalClient};
pub use types::LookupResult;
