pub mod date_range;
pub mod quote_param;
pub mod time_span;

pub use date_range::DateRange;
pub use quote_param::QuoteParam;
pub use time_span::{validate_interval, TimeSpan};
