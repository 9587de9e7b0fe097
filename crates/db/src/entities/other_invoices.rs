//! `SeaORM` Entity for other_invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "other_invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub payment_method: PaymentMethod,
    pub payment_date: Date,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollments,
    #[sea_orm(has_many = "super::other_invoice_items::Entity")]
    OtherInvoiceItems,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::other_invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OtherInvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
