//! Common types used across the application.

pub mod money;

pub use money::{MONEY_EPSILON, amounts_match};
