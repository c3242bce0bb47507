pub mod text;
pub mod time;

pub use text::symbol_file_stem;
pub use time::{parse_date, timestamp_slug};
