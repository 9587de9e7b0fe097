//! Active view over soft-deleted tables.
//!
//! Every table carries a nullable `deleted_at`. Read paths start from
//! [`SoftDeletable::active`] and soft deletes go through
//! [`SoftDeletable::soft_delete`], so the "not deleted" filter lives here
//! and nowhere else.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select, UpdateMany, prelude::DateTimeWithTimeZone,
};

use crate::entities::{
    discounts, enrollments, other_invoice_items, other_invoices, students, tuition_invoice_items,
    tuition_invoices,
};

/// An entity whose rows are soft-deleted rather than removed.
pub trait SoftDeletable: EntityTrait {
    /// The `deleted_at` column.
    fn deleted_at() -> Self::Column;

    /// The `updated_at` column.
    fn updated_at() -> Self::Column;

    /// Condition matching rows that are not soft-deleted.
    fn is_active() -> SimpleExpr {
        Self::deleted_at().is_null()
    }

    /// `SELECT` restricted to rows that are not soft-deleted.
    fn active() -> Select<Self> {
        Self::find().filter(Self::is_active())
    }

    /// `UPDATE` marking matching active rows deleted at `now`.
    ///
    /// Callers add their own filters; rows already deleted are never touched,
    /// so their original deletion time is kept.
    fn soft_delete(now: DateTimeWithTimeZone) -> UpdateMany<Self> {
        Self::update_many()
            .col_expr(Self::deleted_at(), Expr::value(now))
            .col_expr(Self::updated_at(), Expr::value(now))
            .filter(Self::is_active())
    }
}

macro_rules! soft_deletable {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDeletable for $module::Entity {
                fn deleted_at() -> Self::Column {
                    $module::Column::DeletedAt
                }

                fn updated_at() -> Self::Column {
                    $module::Column::UpdatedAt
                }
            }
        )+
    };
}

soft_deletable!(
    students,
    enrollments,
    discounts,
    tuition_invoices,
    tuition_invoice_items,
    other_invoices,
    other_invoice_items,
);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_active_select_filters_deleted_rows() {
        let sql = students::Entity::active().build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""students"."deleted_at" IS NULL"#), "{sql}");
    }

    #[test]
    fn test_soft_delete_only_touches_active_rows() {
        let now = chrono::Utc::now().into();
        let sql = discounts::Entity::soft_delete(now)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.starts_with(r#"UPDATE "discounts" SET "deleted_at" = "#), "{sql}");
        assert!(sql.contains(r#""updated_at" = "#), "{sql}");
        assert!(sql.contains(r#""discounts"."deleted_at" IS NULL"#), "{sql}");
    }
}
