//! `SeaORM` Entity for enrollments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EnrollmentType, GradeLevel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub school_year: String,
    pub grade_level: GradeLevel,
    pub enrollment_type: EnrollmentType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub monthly_tuition: Decimal,
    pub months: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub enrollment_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub misc_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub pta_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub lms_books_fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Students,
    #[sea_orm(has_many = "super::discounts::Entity")]
    Discounts,
    #[sea_orm(has_many = "super::tuition_invoices::Entity")]
    TuitionInvoices,
    #[sea_orm(has_many = "super::other_invoices::Entity")]
    OtherInvoices,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::discounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discounts.def()
    }
}

impl Related<super::tuition_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TuitionInvoices.def()
    }
}

impl Related<super::other_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OtherInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
