//! `SeaORM` Entity for tuition_invoice_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tuition_invoice_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub item_type: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tuition_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::tuition_invoices::Column::Id"
    )]
    TuitionInvoices,
}

impl Related<super::tuition_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TuitionInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
