//! Payment repository: tuition and other-payment invoices.
//!
//! An invoice and its items are written in one [`UnitOfWork`]. Writers hold
//! a share lock on the enrollment so it cannot be deleted mid-payment.

use std::collections::HashMap;
use std::time::Duration;

use bursar_core::payment::{
    OtherPaymentCategory, OtherPaymentInput, PaymentInput, PaymentMethod, TuitionPaymentInput,
};
use bursar_shared::types::{EnrollmentId, InvoiceId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::active::SoftDeletable;
use crate::constraint::{self, Constraint};
use crate::entities::{
    enrollments, other_invoice_items, other_invoices, tuition_invoice_items, tuition_invoices,
};
use crate::unit_of_work::UnitOfWork;

/// Item type stored on every tuition invoice line.
pub const TUITION_ITEM_TYPE: &str = "tuition";

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Enrollment not found or already deleted.
    #[error("Enrollment not found: {0}")]
    NotFound(EnrollmentId),

    /// The invoice number is already used.
    #[error("Invoice number already exists")]
    DuplicateInvoice,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for PaymentError {
    fn from(err: DbErr) -> Self {
        match constraint::violated(&err) {
            Some(Constraint::TuitionInvoiceNumber | Constraint::OtherInvoiceNumber) => {
                Self::DuplicateInvoice
            }
            _ => Self::Database(err),
        }
    }
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicateInvoice => "DUPLICATE_INVOICE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Which invoice table a payment lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Tuition invoice.
    Tuition,
    /// Other-payment invoice.
    Other,
}

/// One line of a recorded invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentItem {
    /// `tuition` for tuition lines, the category code otherwise.
    pub item_type: String,
    /// Amount.
    pub amount: Decimal,
    /// Remarks, empty for tuition lines.
    pub remarks: String,
}

/// A recorded invoice with its active items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Tuition or other.
    pub kind: PaymentKind,
    /// Enrollment paid for.
    pub enrollment_id: EnrollmentId,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Receipt number.
    pub invoice_number: String,
    /// Notes.
    pub notes: String,
    /// Sum of the active items.
    pub total: Decimal,
    /// Active items.
    pub items: Vec<PaymentItem>,
    /// When the invoice was recorded.
    pub created_at: DateTimeWithTimeZone,
}

/// Payment repository for invoice writes and listings.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    statement_timeout: Duration,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    /// Records a tuition payment as an invoice with a single tuition line.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not active, the invoice number
    /// is taken, or the database operation fails.
    pub async fn record_tuition(
        &self,
        enrollment_id: EnrollmentId,
        payment: &TuitionPaymentInput,
    ) -> Result<PaymentRecord, PaymentError> {
        let uow = UnitOfWork::begin(&self.db, self.statement_timeout).await?;
        let result = Self::record_tuition_in(uow.transaction(), enrollment_id, payment).await;
        let record = uow.finish(result).await.inspect_err(log_rejection)?;

        info!(
            %enrollment_id,
            invoice_id = %record.id,
            invoice_number = %record.invoice_number,
            amount = %record.total,
            "Tuition payment recorded"
        );
        Ok(record)
    }

    async fn record_tuition_in(
        txn: &DatabaseTransaction,
        enrollment_id: EnrollmentId,
        payment: &TuitionPaymentInput,
    ) -> Result<PaymentRecord, PaymentError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self::hold_enrollment(txn, enrollment_id).await?;

        let header = &payment.invoice;
        let invoice = tuition_invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            enrollment_id: Set(enrollment_id.into_inner()),
            payment_method: Set(header.payment_method.into()),
            payment_date: Set(header.payment_date),
            invoice_number: Set(header.invoice_number.trim().to_string()),
            notes: Set(header.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(txn)
        .await?;

        let item = tuition_invoice_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_id: Set(invoice.id),
            item_type: Set(TUITION_ITEM_TYPE.to_string()),
            amount: Set(payment.amount),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(txn)
        .await?;

        Ok(tuition_record(invoice, vec![item]))
    }

    /// Records a non-tuition payment with one or more categorised items.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not active, the invoice number
    /// is taken, or the database operation fails.
    pub async fn record_other(
        &self,
        enrollment_id: EnrollmentId,
        payment: &OtherPaymentInput,
    ) -> Result<PaymentRecord, PaymentError> {
        let uow = UnitOfWork::begin(&self.db, self.statement_timeout).await?;
        let result = Self::record_other_in(uow.transaction(), enrollment_id, payment).await;
        let record = uow.finish(result).await.inspect_err(log_rejection)?;

        info!(
            %enrollment_id,
            invoice_id = %record.id,
            invoice_number = %record.invoice_number,
            items = record.items.len(),
            amount = %record.total,
            "Other payment recorded"
        );
        Ok(record)
    }

    async fn record_other_in(
        txn: &DatabaseTransaction,
        enrollment_id: EnrollmentId,
        payment: &OtherPaymentInput,
    ) -> Result<PaymentRecord, PaymentError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self::hold_enrollment(txn, enrollment_id).await?;

        let header: &PaymentInput = &payment.invoice;
        let invoice = other_invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            enrollment_id: Set(enrollment_id.into_inner()),
            payment_method: Set(header.payment_method.into()),
            payment_date: Set(header.payment_date),
            invoice_number: Set(header.invoice_number.trim().to_string()),
            notes: Set(header.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(txn)
        .await?;

        let mut items = Vec::with_capacity(payment.items.len());
        for line in &payment.items {
            let item = other_invoice_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                invoice_id: Set(invoice.id),
                category: Set(line.category.into()),
                amount: Set(line.amount),
                remarks: Set(line.remarks.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(txn)
            .await?;
            items.push(item);
        }

        Ok(other_record(invoice, items))
    }

    /// Active tuition and other payments of an enrollment, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not active or the database
    /// query fails.
    pub async fn list(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        let uow = UnitOfWork::begin_read(&self.db, self.statement_timeout).await?;
        let result = Self::list_in(uow.transaction(), enrollment_id).await;
        uow.finish(result).await
    }

    async fn list_in(
        txn: &DatabaseTransaction,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(enrollment_id.into_inner()))
            .one(txn)
            .await?
            .ok_or(PaymentError::NotFound(enrollment_id))?;

        let tuition = tuition_invoices::Entity::active()
            .filter(tuition_invoices::Column::EnrollmentId.eq(enrollment_id.into_inner()))
            .all(txn)
            .await?;
        let mut tuition_items = group_by_invoice(
            tuition_invoice_items::Entity::active()
                .filter(
                    tuition_invoice_items::Column::InvoiceId
                        .is_in(tuition.iter().map(|invoice| invoice.id)),
                )
                .order_by_asc(tuition_invoice_items::Column::CreatedAt)
                .all(txn)
                .await?,
            |item| item.invoice_id,
        );

        let other = other_invoices::Entity::active()
            .filter(other_invoices::Column::EnrollmentId.eq(enrollment_id.into_inner()))
            .all(txn)
            .await?;
        let mut other_items = group_by_invoice(
            other_invoice_items::Entity::active()
                .filter(
                    other_invoice_items::Column::InvoiceId
                        .is_in(other.iter().map(|invoice| invoice.id)),
                )
                .order_by_asc(other_invoice_items::Column::CreatedAt)
                .all(txn)
                .await?,
            |item| item.invoice_id,
        );

        let mut records: Vec<PaymentRecord> = tuition
            .into_iter()
            .map(|invoice| {
                let items = tuition_items.remove(&invoice.id).unwrap_or_default();
                tuition_record(invoice, items)
            })
            .chain(other.into_iter().map(|invoice| {
                let items = other_items.remove(&invoice.id).unwrap_or_default();
                other_record(invoice, items)
            }))
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Share-locks an active enrollment for the rest of the transaction.
    async fn hold_enrollment(
        txn: &DatabaseTransaction,
        enrollment_id: EnrollmentId,
    ) -> Result<(), PaymentError> {
        enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(enrollment_id.into_inner()))
            .lock_shared()
            .one(txn)
            .await?
            .map(|_| ())
            .ok_or(PaymentError::NotFound(enrollment_id))
    }
}

fn group_by_invoice<T>(items: Vec<T>, invoice_id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(invoice_id(&item)).or_default().push(item);
    }
    grouped
}

fn tuition_record(
    invoice: tuition_invoices::Model,
    items: Vec<tuition_invoice_items::Model>,
) -> PaymentRecord {
    let items: Vec<PaymentItem> = items
        .into_iter()
        .map(|item| PaymentItem {
            item_type: item.item_type,
            amount: item.amount,
            remarks: String::new(),
        })
        .collect();

    PaymentRecord {
        id: InvoiceId::from_uuid(invoice.id),
        kind: PaymentKind::Tuition,
        enrollment_id: EnrollmentId::from_uuid(invoice.enrollment_id),
        payment_method: invoice.payment_method.into(),
        payment_date: invoice.payment_date,
        invoice_number: invoice.invoice_number,
        notes: invoice.notes,
        total: items.iter().map(|item| item.amount).sum(),
        items,
        created_at: invoice.created_at,
    }
}

fn other_record(
    invoice: other_invoices::Model,
    items: Vec<other_invoice_items::Model>,
) -> PaymentRecord {
    let items: Vec<PaymentItem> = items
        .into_iter()
        .map(|item| PaymentItem {
            item_type: OtherPaymentCategory::from(item.category)
                .as_str()
                .to_string(),
            amount: item.amount,
            remarks: item.remarks,
        })
        .collect();

    PaymentRecord {
        id: InvoiceId::from_uuid(invoice.id),
        kind: PaymentKind::Other,
        enrollment_id: EnrollmentId::from_uuid(invoice.enrollment_id),
        payment_method: invoice.payment_method.into(),
        payment_date: invoice.payment_date,
        invoice_number: invoice.invoice_number,
        notes: invoice.notes,
        total: items.iter().map(|item| item.amount).sum(),
        items,
        created_at: invoice.created_at,
    }
}

/// Payment date descending, then recording time descending.
fn sort_newest_first(records: &mut [PaymentRecord]) {
    records.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn log_rejection(err: &PaymentError) {
    if !matches!(err, PaymentError::Database(_)) {
        warn!(code = err.error_code(), error = %err, "Payment rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{
        OtherPaymentCategory as DbCategory, PaymentMethod as DbMethod,
    };
    use rust_decimal_macros::dec;
    use sea_orm::RuntimeErr;

    fn at(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn other_invoice(day: u32) -> other_invoices::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        other_invoices::Model {
            id: Uuid::now_v7(),
            enrollment_id: Uuid::now_v7(),
            payment_method: DbMethod::GCash,
            payment_date: at(day),
            invoice_number: format!("OR-{day}"),
            notes: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn other_item(
        invoice_id: Uuid,
        category: DbCategory,
        amount: Decimal,
    ) -> other_invoice_items::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        other_invoice_items::Model {
            id: Uuid::now_v7(),
            invoice_id,
            category,
            amount,
            remarks: "size M".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_other_record_sums_items() {
        let invoice = other_invoice(3);
        let items = vec![
            other_item(invoice.id, DbCategory::PeShirt, dec!(350)),
            other_item(invoice.id, DbCategory::PtaFee, dec!(300)),
        ];

        let record = other_record(invoice, items);

        assert_eq!(record.kind, PaymentKind::Other);
        assert_eq!(record.payment_method, PaymentMethod::GCash);
        assert_eq!(record.total, dec!(650));
        assert_eq!(record.items[0].item_type, "pe_shirt");
        assert_eq!(record.items[1].item_type, "pta_fee");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![
            other_record(other_invoice(1), Vec::new()),
            other_record(other_invoice(9), Vec::new()),
            other_record(other_invoice(5), Vec::new()),
        ];

        sort_newest_first(&mut records);

        let dates: Vec<NaiveDate> = records.iter().map(|r| r.payment_date).collect();
        assert_eq!(dates, vec![at(9), at(5), at(1)]);
    }

    #[test]
    fn test_group_by_invoice() {
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let grouped = group_by_invoice(
            vec![
                other_item(first, DbCategory::Id, dec!(100)),
                other_item(second, DbCategory::Patch, dec!(50)),
                other_item(first, DbCategory::Others, dec!(20)),
            ],
            |item| item.invoice_id,
        );

        assert_eq!(grouped[&first].len(), 2);
        assert_eq!(grouped[&second].len(), 1);
    }

    #[test]
    fn test_unmapped_db_error_stays_opaque() {
        let err = PaymentError::from(DbErr::Exec(RuntimeErr::Internal(
            "connection reset".to_string(),
        )));
        assert!(matches!(err, PaymentError::Database(_)));
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(PaymentError::DuplicateInvoice.error_code(), "DUPLICATE_INVOICE");
    }
}
