//! Shared configuration, errors, and money helpers for Strongroom.
//!
//! This crate provides common pieces used across all other crates:
//! - Money helpers with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CashConfig};
pub use error::AppError;
