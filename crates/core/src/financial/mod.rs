//! Totals due and paid per enrollment.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::FinancialService;
pub use types::{EnrollmentFinancials, FinancialSummary, PaymentStatus, StudentSummary, TuitionRow};
