//! Discount persistence and reconciliation.
//!
//! Discount rows are never hard-deleted. Reconciliation runs inside the
//! caller's transaction, after the owning enrollment row has been locked.

use bursar_core::discount::{ActiveDiscount, ComputedDiscount, plan_reconciliation};
use bursar_shared::types::{DiscountId, EnrollmentId};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::debug;

use crate::active::SoftDeletable;
use crate::entities::discounts;

/// Discount rows owned by enrollments.
pub struct DiscountReconciler;

impl DiscountReconciler {
    /// Inserts a fresh active discount row.
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        enrollment_id: EnrollmentId,
        discount: &ComputedDiscount,
        now: DateTimeWithTimeZone,
    ) -> Result<discounts::Model, DbErr> {
        discounts::ActiveModel {
            id: Set(DiscountId::new().into_inner()),
            enrollment_id: Set(enrollment_id.into_inner()),
            discount_type: Set(discount.discount_type.into()),
            scope: Set(discount.scope.into()),
            amount: Set(discount.amount),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(conn)
        .await
    }

    /// Active discounts of an enrollment, in discount type order.
    pub async fn active_for<C: ConnectionTrait>(
        conn: &C,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<discounts::Model>, DbErr> {
        discounts::Entity::active()
            .filter(discounts::Column::EnrollmentId.eq(enrollment_id.into_inner()))
            .order_by_asc(discounts::Column::DiscountType)
            .all(conn)
            .await
    }

    /// Every discount row of an enrollment, soft-deleted ones included.
    pub async fn history_for<C: ConnectionTrait>(
        conn: &C,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<discounts::Model>, DbErr> {
        discounts::Entity::find()
            .filter(discounts::Column::EnrollmentId.eq(enrollment_id.into_inner()))
            .order_by_asc(discounts::Column::CreatedAt)
            .order_by_asc(discounts::Column::Id)
            .all(conn)
            .await
    }

    /// Brings an enrollment's active discounts in line with `requested`.
    ///
    /// Matching active rows get the new amount, missing ones are inserted,
    /// and unrequested non-carpool rows are soft-deleted. Returns the active
    /// set afterwards.
    pub async fn reconcile<C: ConnectionTrait>(
        conn: &C,
        enrollment_id: EnrollmentId,
        requested: &[ComputedDiscount],
        now: DateTimeWithTimeZone,
    ) -> Result<Vec<discounts::Model>, DbErr> {
        let current: Vec<ActiveDiscount> = Self::active_for(conn, enrollment_id)
            .await?
            .into_iter()
            .map(to_active)
            .collect();

        let plan = plan_reconciliation(&current, requested);
        debug!(
            %enrollment_id,
            updates = plan.updates.len(),
            inserts = plan.inserts.len(),
            removals = plan.removals.len(),
            "Reconciling discounts"
        );

        for (id, amount) in &plan.updates {
            discounts::Entity::update_many()
                .col_expr(discounts::Column::Amount, Expr::value(*amount))
                .col_expr(discounts::Column::UpdatedAt, Expr::value(now))
                .filter(discounts::Entity::is_active())
                .filter(discounts::Column::Id.eq(id.into_inner()))
                .exec(conn)
                .await?;
        }

        for discount in &plan.inserts {
            Self::insert(conn, enrollment_id, discount, now).await?;
        }

        if !plan.removals.is_empty() {
            let ids: Vec<_> = plan.removals.iter().map(|id| id.into_inner()).collect();
            discounts::Entity::soft_delete(now)
                .filter(discounts::Column::EnrollmentId.eq(enrollment_id.into_inner()))
                .filter(discounts::Column::Id.is_in(ids))
                .exec(conn)
                .await?;
        }

        Self::active_for(conn, enrollment_id).await
    }
}

fn to_active(row: discounts::Model) -> ActiveDiscount {
    ActiveDiscount {
        id: DiscountId::from_uuid(row.id),
        discount_type: row.discount_type.into(),
        scope: row.scope.into(),
        amount: row.amount,
    }
}

/// Domain view of a stored discount row.
#[must_use]
pub fn to_computed(row: &discounts::Model) -> ComputedDiscount {
    ComputedDiscount {
        discount_type: row.discount_type.into(),
        scope: row.scope.into(),
        amount: row.amount,
    }
}
