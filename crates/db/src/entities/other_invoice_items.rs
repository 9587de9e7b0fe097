//! `SeaORM` Entity for other_invoice_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OtherPaymentCategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "other_invoice_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub category: OtherPaymentCategory,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub remarks: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::other_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::other_invoices::Column::Id"
    )]
    OtherInvoices,
}

impl Related<super::other_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OtherInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
