pub mod config;
pub mod error;
pub mod finding;
pub mod record;
pub mod report;
pub mod verdict;
