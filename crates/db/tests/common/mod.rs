//! Shared fixtures for database integration tests.
//!
//! Tests run against `DATABASE_URL` and are skipped when it is unset.

#![allow(dead_code)]

use std::time::Duration;

use bursar_core::discount::DiscountRequest;
use bursar_core::enrollment::{
    FeeSchedule, Gender, GradeLevel, NewEnrollment, SchoolYear, StudentProfile, StudentSource,
};
use bursar_db::migration::{Migrator, MigratorTrait};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

static MIGRATED: Mutex<bool> = Mutex::const_new(false);

fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("BURSAR__DATABASE__URL"))
        .ok()
}

/// Connects and applies migrations once per test binary.
pub async fn setup() -> Option<DatabaseConnection> {
    let Some(url) = database_url() else {
        eprintln!("Skipping: DATABASE_URL not set");
        return None;
    };
    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping: cannot connect to database: {e}");
            return None;
        }
    };

    let mut migrated = MIGRATED.lock().await;
    if !*migrated {
        Migrator::up(&db, None).await.expect("migrations failed");
        *migrated = true;
    }
    Some(db)
}

/// A student whose identity is unique to this call.
pub fn profile() -> StudentProfile {
    StudentProfile {
        first_name: "Juan".to_string(),
        middle_name: "Santos".to_string(),
        last_name: format!("Cruz{}", Uuid::new_v4().simple()),
        suffix: String::new(),
        gender: Gender::Male,
        birthdate: NaiveDate::from_ymd_opt(2018, 3, 14).unwrap(),
        address: "12 Mabini St".to_string(),
        mother_name: "Maria Cruz".to_string(),
        mother_job: "Teacher".to_string(),
        mother_education: "College".to_string(),
        father_name: "Jose Cruz".to_string(),
        father_job: "Engineer".to_string(),
        father_education: "College".to_string(),
        contact_numbers: vec!["09171234567".to_string()],
        living_with: "Parents".to_string(),
    }
}

/// Monthly tuition 2600, enrollment 4000, misc 500, PTA 300, LMS/books 8000.
pub fn fees() -> FeeSchedule {
    FeeSchedule {
        monthly_tuition: dec!(2600),
        enrollment_fee: dec!(4000),
        misc_fee: dec!(500),
        pta_fee: dec!(300),
        lms_books_fee: dec!(8000),
    }
}

pub fn school_year(value: &str) -> SchoolYear {
    SchoolYear::parse(value).unwrap()
}

pub fn new_enrollment(student: StudentProfile, codes: &[&str]) -> NewEnrollment {
    NewEnrollment {
        source: StudentSource::New { student },
        school_year: school_year("2024-2025"),
        grade_level: GradeLevel::Grade1,
        fees: fees(),
        discounts: DiscountRequest::from_codes(codes.iter().copied()),
    }
}

/// Invoice number unique to this call.
pub fn invoice_number() -> String {
    format!("OR-{}", Uuid::new_v4().simple())
}
