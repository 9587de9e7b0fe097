//! Financial aggregator read path.
//!
//! Discount and payment totals are summed by separate queries keyed by
//! enrollment, so joining both to the enrollment never multiplies rows.
//! Every read runs in one `REPEATABLE READ` snapshot.

use std::collections::HashMap;
use std::time::Duration;

use bursar_core::discount::ComputedDiscount;
use bursar_core::enrollment::{FeeSchedule, SchoolYear, display_name};
use bursar_core::financial::{
    EnrollmentFinancials, FinancialService, StudentSummary, TuitionRow,
};
use bursar_core::payment::OtherPaymentCategory;
use bursar_shared::types::{EnrollmentId, PageRequest, PageResponse, StudentId};
use rust_decimal::Decimal;
use sea_orm::prelude::Uuid;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use super::discount::{DiscountReconciler, to_computed};
use crate::active::SoftDeletable;
use crate::entities::sea_orm_active_enums::OtherPaymentCategory as DbCategory;
use crate::entities::{
    discounts, enrollments, other_invoice_items, other_invoices, students, tuition_invoice_items,
    tuition_invoices,
};
use crate::unit_of_work::UnitOfWork;

/// Error types for financial reads.
#[derive(Debug, thiserror::Error)]
pub enum FinancialError {
    /// Enrollment not found or already deleted.
    #[error("Enrollment not found: {0}")]
    NotFound(EnrollmentId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl FinancialError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Financial repository for enrollment balances.
#[derive(Debug, Clone)]
pub struct FinancialRepository {
    db: DatabaseConnection,
    statement_timeout: Duration,
}

impl FinancialRepository {
    /// Creates a new financial repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    /// Fees, discount breakdown and payment position of one enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment or its student is not active, or
    /// the database query fails.
    pub async fn get_financials(
        &self,
        id: EnrollmentId,
    ) -> Result<EnrollmentFinancials, FinancialError> {
        let uow = UnitOfWork::begin_read(&self.db, self.statement_timeout).await?;
        let result = Self::financials_in(uow.transaction(), id).await;
        uow.finish(result).await
    }

    async fn financials_in(
        txn: &DatabaseTransaction,
        id: EnrollmentId,
    ) -> Result<EnrollmentFinancials, FinancialError> {
        let (enrollment, student) = enrollments::Entity::active()
            .filter(enrollments::Column::Id.eq(id.into_inner()))
            .find_also_related(students::Entity)
            .filter(students::Entity::is_active())
            .one(txn)
            .await?
            .and_then(|(enrollment, student)| student.map(|s| (enrollment, s)))
            .ok_or(FinancialError::NotFound(id))?;

        let discounts: Vec<ComputedDiscount> = DiscountReconciler::active_for(txn, id)
            .await?
            .iter()
            .map(to_computed)
            .collect();
        let paid = paid_totals(txn, &[enrollment.id])
            .await?
            .remove(&enrollment.id)
            .unwrap_or(Decimal::ZERO);

        let fees = fee_schedule(&enrollment);
        let months = stored_months(enrollment.months)?;
        let discount_total: Decimal = discounts.iter().map(|d| d.amount).sum();
        let summary = FinancialService::from_totals(
            FinancialService::total_due(&fees, months, discounts.iter().map(|d| d.amount)),
            paid,
        );

        Ok(EnrollmentFinancials {
            enrollment_id: id,
            student: StudentSummary {
                id: StudentId::from_uuid(student.id),
                full_name: display_name(
                    &student.first_name,
                    &student.middle_name,
                    &student.last_name,
                    &student.suffix,
                ),
                first_name: student.first_name,
                middle_name: student.middle_name,
                last_name: student.last_name,
                suffix: student.suffix,
            },
            school_year: stored_school_year(&enrollment.school_year)?,
            grade_level: enrollment.grade_level.into(),
            enrollment_type: enrollment.enrollment_type.into(),
            fees,
            months,
            discount_types: discounts.iter().map(|d| d.discount_type).collect(),
            discounts,
            discount_total,
            summary,
        })
    }

    /// Paginated balances of active enrollments, newest first.
    ///
    /// `search` matches anywhere in the student's full name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<TuitionRow>, FinancialError> {
        let uow = UnitOfWork::begin_read(&self.db, self.statement_timeout).await?;
        let result = Self::list_in(uow.transaction(), request).await;
        uow.finish(result).await
    }

    async fn list_in(
        txn: &DatabaseTransaction,
        request: &PageRequest,
    ) -> Result<PageResponse<TuitionRow>, FinancialError> {
        let total = listing_query(request.search_term()).count(txn).await?;

        let page = listing_query(request.search_term())
            .select_also(students::Entity)
            .order_by_desc(enrollments::Column::CreatedAt)
            .order_by_asc(enrollments::Column::Id)
            .offset(request.offset())
            .limit(request.limit())
            .all(txn)
            .await?;

        let ids: Vec<Uuid> = page.iter().map(|(enrollment, _)| enrollment.id).collect();
        let mut discounts = discounts_by_enrollment(txn, &ids).await?;
        let paid = paid_totals(txn, &ids).await?;

        let mut rows = Vec::with_capacity(page.len());
        for (enrollment, student) in page {
            // `listing_query` inner-joins students, so every row carries one.
            let Some(student) = student else { continue };
            let discounts = discounts.remove(&enrollment.id).unwrap_or_default();
            let fees = fee_schedule(&enrollment);
            let months = stored_months(enrollment.months)?;
            let summary = FinancialService::from_totals(
                FinancialService::total_due(&fees, months, discounts.iter().map(|d| d.amount)),
                paid.get(&enrollment.id).copied().unwrap_or(Decimal::ZERO),
            );

            rows.push(TuitionRow {
                enrollment_id: EnrollmentId::from_uuid(enrollment.id),
                student_id: StudentId::from_uuid(student.id),
                full_name: display_name(
                    &student.first_name,
                    &student.middle_name,
                    &student.last_name,
                    &student.suffix,
                ),
                school_year: stored_school_year(&enrollment.school_year)?,
                grade_level: enrollment.grade_level.into(),
                discount_types: discounts.iter().map(|d| d.discount_type).collect(),
                summary,
            });
        }

        Ok(PageResponse::new(
            rows,
            request.page(),
            request.per_page(),
            total,
        ))
    }
}

/// Active enrollments of active students, optionally filtered by name.
fn listing_query(search: Option<&str>) -> Select<enrollments::Entity> {
    let query = enrollments::Entity::active()
        .inner_join(students::Entity)
        .filter(students::Entity::is_active());

    match search {
        Some(term) => query.filter(name_matches(term)),
        None => query,
    }
}

/// Case-insensitive substring match on `first middle last suffix`.
fn name_matches(term: &str) -> SimpleExpr {
    Expr::cust_with_values(
        r#"LOWER(CONCAT_WS(' ', NULLIF("students"."first_name", ''), NULLIF("students"."middle_name", ''), NULLIF("students"."last_name", ''), NULLIF("students"."suffix", ''))) LIKE $1"#,
        [like_pattern(term)],
    )
}

/// `%term%` with LIKE wildcards in `term` escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Active discounts of several enrollments, grouped by enrollment.
async fn discounts_by_enrollment<C: ConnectionTrait>(
    conn: &C,
    enrollment_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<ComputedDiscount>>, DbErr> {
    let mut grouped: HashMap<Uuid, Vec<ComputedDiscount>> = HashMap::new();
    if enrollment_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = discounts::Entity::active()
        .filter(discounts::Column::EnrollmentId.is_in(enrollment_ids.iter().copied()))
        .order_by_asc(discounts::Column::DiscountType)
        .all(conn)
        .await?;
    for row in &rows {
        grouped
            .entry(row.enrollment_id)
            .or_default()
            .push(to_computed(row));
    }
    Ok(grouped)
}

/// Amounts paid toward the balance of each enrollment.
///
/// Counts active items of active tuition invoices, plus active items of
/// active other invoices whose category is a fee component. Enrollments
/// with no payments are absent from the map.
pub(crate) async fn paid_totals<C: ConnectionTrait>(
    conn: &C,
    enrollment_ids: &[Uuid],
) -> Result<HashMap<Uuid, Decimal>, DbErr> {
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    if enrollment_ids.is_empty() {
        return Ok(totals);
    }

    let tuition: Vec<(Uuid, Option<Decimal>)> = tuition_invoice_items::Entity::active()
        .inner_join(tuition_invoices::Entity)
        .filter(tuition_invoices::Entity::is_active())
        .filter(tuition_invoices::Column::EnrollmentId.is_in(enrollment_ids.iter().copied()))
        .select_only()
        .column(tuition_invoices::Column::EnrollmentId)
        .column_as(
            Expr::col((tuition_invoice_items::Entity, tuition_invoice_items::Column::Amount)).sum(),
            "total",
        )
        .group_by(tuition_invoices::Column::EnrollmentId)
        .into_tuple()
        .all(conn)
        .await?;

    let balance_categories: Vec<DbCategory> = OtherPaymentCategory::balance_categories()
        .into_iter()
        .map(DbCategory::from)
        .collect();
    let other: Vec<(Uuid, Option<Decimal>)> = other_invoice_items::Entity::active()
        .inner_join(other_invoices::Entity)
        .filter(other_invoices::Entity::is_active())
        .filter(other_invoices::Column::EnrollmentId.is_in(enrollment_ids.iter().copied()))
        .filter(other_invoice_items::Column::Category.is_in(balance_categories))
        .select_only()
        .column(other_invoices::Column::EnrollmentId)
        .column_as(
            Expr::col((other_invoice_items::Entity, other_invoice_items::Column::Amount)).sum(),
            "total",
        )
        .group_by(other_invoices::Column::EnrollmentId)
        .into_tuple()
        .all(conn)
        .await?;

    for (enrollment_id, amount) in tuition.into_iter().chain(other) {
        *totals.entry(enrollment_id).or_insert(Decimal::ZERO) += amount.unwrap_or(Decimal::ZERO);
    }
    Ok(totals)
}

fn fee_schedule(row: &enrollments::Model) -> FeeSchedule {
    FeeSchedule {
        monthly_tuition: row.monthly_tuition,
        enrollment_fee: row.enrollment_fee,
        misc_fee: row.misc_fee,
        pta_fee: row.pta_fee,
        lms_books_fee: row.lms_books_fee,
    }
}

fn stored_months(months: i32) -> Result<u32, DbErr> {
    u32::try_from(months).map_err(|_| DbErr::Type(format!("invalid months value: {months}")))
}

fn stored_school_year(value: &str) -> Result<SchoolYear, DbErr> {
    SchoolYear::parse(value).ok_or_else(|| DbErr::Type(format!("invalid school year: {value}")))
}
