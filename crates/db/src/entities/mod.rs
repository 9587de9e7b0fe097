//! `SeaORM` entity definitions.

pub mod discounts;
pub mod enrollments;
pub mod other_invoice_items;
pub mod other_invoices;
pub mod sea_orm_active_enums;
pub mod students;
pub mod tuition_invoice_items;
pub mod tuition_invoices;
