pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod records;
pub mod transport;
pub mod utils;

pub use config::{ClientConfig, RequestConfig};
pub use error::{AppError, FetchError, Result};
pub use fetch::{FetchResult, YahooClient};
