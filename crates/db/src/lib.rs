//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions and migrations
//! - The active view over soft-deleted rows
//! - Constraint-name translation for storage errors
//! - Bounded units of work
//! - Repositories for enrollments, discounts, payments and balances

pub mod active;
pub mod constraint;
pub mod entities;
pub mod migration;
pub mod repositories;
pub mod unit_of_work;

pub use repositories::{
    EnrollmentRepository, FinancialRepository, PaymentRepository,
};

use bursar_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout())
        .acquire_timeout(config.connect_timeout())
        .sqlx_logging(false);

    Database::connect(options).await
}
