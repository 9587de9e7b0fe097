//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{CURRENCY_SCALE, format_amount, round_for_display};
pub use pagination::{PageMeta, PageRequest, PageResponse};
