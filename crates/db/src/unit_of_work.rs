//! Bounded database transactions.
//!
//! A [`UnitOfWork`] wraps one `PostgreSQL` transaction whose statements are
//! capped by `statement_timeout`. Exceeding the cap aborts the statement and,
//! with it, the transaction.
//!
//! # Usage
//!
//! ```ignore
//! use bursar_db::unit_of_work::UnitOfWork;
//!
//! let uow = UnitOfWork::begin(&db, Duration::from_secs(5)).await?;
//! let result = do_writes(uow.transaction()).await;
//! let value = uow.finish(result).await?;
//! ```

use std::time::Duration;

use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel,
    TransactionTrait,
};
use tracing::warn;

/// A database transaction with a per-statement timeout.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Begins a transaction and applies the statement timeout.
    ///
    /// The timeout is set with `SET LOCAL`, which scopes it to this
    /// transaction only.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the timeout
    /// cannot be set.
    pub async fn begin(
        db: &DatabaseConnection,
        statement_timeout: Duration,
    ) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&statement_timeout_sql(statement_timeout))
            .await?;
        Ok(Self { txn })
    }

    /// Begins a read-only `REPEATABLE READ` transaction.
    ///
    /// Every statement sees the same snapshot, so totals computed from
    /// several queries agree with each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the timeout
    /// cannot be set.
    pub async fn begin_read(
        db: &DatabaseConnection,
        statement_timeout: Duration,
    ) -> Result<Self, DbErr> {
        let txn = db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;
        txn.execute_unprepared(&statement_timeout_sql(statement_timeout))
            .await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }

    /// Commits on `Ok`, rolls back on `Err`.
    ///
    /// The original error is returned unchanged after rollback. A failed
    /// rollback is logged; the server discards the transaction anyway when
    /// the connection returns to the pool.
    ///
    /// # Errors
    ///
    /// Returns `result`'s error, or the commit error.
    pub async fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E>
    where
        E: From<DbErr>,
    {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// `SET LOCAL` statement for a timeout, in whole milliseconds.
#[must_use]
pub fn statement_timeout_sql(timeout: Duration) -> String {
    format!("SET LOCAL statement_timeout = '{}ms'", timeout.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_timeout_sql_format() {
        assert_eq!(
            statement_timeout_sql(Duration::from_secs(5)),
            "SET LOCAL statement_timeout = '5000ms'"
        );
        assert_eq!(
            statement_timeout_sql(Duration::from_millis(250)),
            "SET LOCAL statement_timeout = '250ms'"
        );
    }
}
