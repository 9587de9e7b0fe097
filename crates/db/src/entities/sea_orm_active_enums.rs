//! `SeaORM` active enums mirroring the Postgres enum types.

use bursar_core::discount::{DiscountScope as CoreDiscountScope, DiscountType as CoreDiscountType};
use bursar_core::enrollment::{
    EnrollmentType as CoreEnrollmentType, Gender as CoreGender, GradeLevel as CoreGradeLevel,
};
use bursar_core::payment::{
    OtherPaymentCategory as CoreOtherPaymentCategory, PaymentMethod as CorePaymentMethod,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "grade_level")]
pub enum GradeLevel {
    #[sea_orm(string_value = "nursery-1")]
    Nursery1,
    #[sea_orm(string_value = "nursery-2")]
    Nursery2,
    #[sea_orm(string_value = "kinder-1")]
    Kinder1,
    #[sea_orm(string_value = "kinder-2")]
    Kinder2,
    #[sea_orm(string_value = "grade-1")]
    Grade1,
    #[sea_orm(string_value = "grade-2")]
    Grade2,
    #[sea_orm(string_value = "grade-3")]
    Grade3,
    #[sea_orm(string_value = "grade-4")]
    Grade4,
    #[sea_orm(string_value = "grade-5")]
    Grade5,
    #[sea_orm(string_value = "grade-6")]
    Grade6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "enrollment_type")]
pub enum EnrollmentType {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "old")]
    Old,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "discount_type")]
pub enum DiscountType {
    #[sea_orm(string_value = "rank_1")]
    Rank1,
    #[sea_orm(string_value = "sibling")]
    Sibling,
    #[sea_orm(string_value = "full_year")]
    FullYear,
    #[sea_orm(string_value = "scholar")]
    Scholar,
    #[sea_orm(string_value = "carpool")]
    Carpool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "discount_scope")]
pub enum DiscountScope {
    #[sea_orm(string_value = "lms_books")]
    LmsBooks,
    #[sea_orm(string_value = "tuition")]
    Tuition,
    #[sea_orm(string_value = "carpool")]
    Carpool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "g-cash")]
    GCash,
    #[sea_orm(string_value = "bank")]
    Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "other_payment_category")]
pub enum OtherPaymentCategory {
    #[sea_orm(string_value = "enrollment_fee")]
    EnrollmentFee,
    #[sea_orm(string_value = "pta_fee")]
    PtaFee,
    #[sea_orm(string_value = "misc_fee")]
    MiscFee,
    #[sea_orm(string_value = "lms_fee")]
    LmsFee,
    #[sea_orm(string_value = "pe_shirt")]
    PeShirt,
    #[sea_orm(string_value = "pe_pants")]
    PePants,
    #[sea_orm(string_value = "id")]
    Id,
    #[sea_orm(string_value = "patch")]
    Patch,
    #[sea_orm(string_value = "carpool")]
    Carpool,
    #[sea_orm(string_value = "others")]
    Others,
}

// Conversions between storage enums and domain enums. Both sides are closed
// sets with the same members, so every mapping is total.

macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(Gender, CoreGender, [Male, Female]);
mirror_enum!(
    GradeLevel,
    CoreGradeLevel,
    [Nursery1, Nursery2, Kinder1, Kinder2, Grade1, Grade2, Grade3, Grade4, Grade5, Grade6]
);
mirror_enum!(EnrollmentType, CoreEnrollmentType, [New, Old]);
mirror_enum!(DiscountType, CoreDiscountType, [Rank1, Sibling, FullYear, Scholar, Carpool]);
mirror_enum!(DiscountScope, CoreDiscountScope, [LmsBooks, Tuition, Carpool]);
mirror_enum!(PaymentMethod, CorePaymentMethod, [Cash, GCash, Bank]);
mirror_enum!(
    OtherPaymentCategory,
    CoreOtherPaymentCategory,
    [EnrollmentFee, PtaFee, MiscFee, LmsFee, PeShirt, PePants, Id, Patch, Carpool, Others]
);
