//! CLI command implementations

pub mod ask;
pub mod configure;
pub mod context;
pub mod history;
pub mod init;
pub mod metrics;
pub mod patient;
pub mod reset;
pub mod search;
pub mod status;
