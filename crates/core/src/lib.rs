//! Core business logic for Strongroom.
//!
//! This crate contains pure business rules with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Daily cash positions, flow categories, and count variance
//! - `deposit` - Multi-day deposit selection, variance tolerance, and urgency
//! - `approval` - Transfer/adjustment approval state machine
//! - `reconciliation` - Transaction kinds and reconciliation vocabulary

pub mod approval;
pub mod deposit;
pub mod ledger;
pub mod reconciliation;
