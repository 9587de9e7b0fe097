//! Core business logic for Bursar.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `discount` - Discount rule engine and reconciliation planning
//! - `enrollment` - Fee schedules, student profiles, payload validation
//! - `financial` - Amount due, amount paid and payment status
//! - `payment` - Tuition and other payment inputs

pub mod discount;
pub mod enrollment;
pub mod financial;
pub mod payment;
