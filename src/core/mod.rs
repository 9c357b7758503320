pub mod history;
pub mod import;
pub mod log;
pub mod metadata;
pub mod sentence;
