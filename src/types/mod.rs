pub mod assessment;
pub mod config;
pub mod records;
pub mod report;
