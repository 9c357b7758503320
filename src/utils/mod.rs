pub mod path;
pub mod table;
pub mod time;

pub use time::format_local_timestamp;
