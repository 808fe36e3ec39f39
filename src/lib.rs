pub mod common;
pub mod config;
pub mod error;
pub mod scenario;
pub mod stat;
pub mod timeline;
