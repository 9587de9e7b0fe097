//! Repository abstractions for data access.
//!
//! Repositories hide the `SeaORM` details from the API layer. Each write
//! runs in its own [`UnitOfWork`](crate::unit_of_work::UnitOfWork).

pub mod discount;
pub mod enrollment;
pub mod financial;
pub mod payment;

pub use discount::DiscountReconciler;
pub use enrollment::{DeleteOutcome, EnrollmentAggregate, EnrollmentError, EnrollmentRepository};
pub use financial::{FinancialError, FinancialRepository};
pub use payment::{PaymentError, PaymentItem, PaymentKind, PaymentRecord, PaymentRepository};
