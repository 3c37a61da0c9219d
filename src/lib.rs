pub mod config;
pub mod error;
pub mod geocode;
pub mod sheet;
pub mod utils;
pub mod verify;

pub use config::Config;
pub use error::{Result, VerifyError};
