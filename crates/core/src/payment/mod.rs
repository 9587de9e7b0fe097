//! Payment types and input validation.

pub mod types;

pub use types::{
    OtherPaymentCategory, OtherPaymentInput, OtherPaymentItem, PaymentInput, PaymentMethod,
    TuitionPaymentInput,
};
