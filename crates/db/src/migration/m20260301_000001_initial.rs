//! Initial database migration.
//!
//! Creates the enums, student/enrollment/discount tables and the tuition and
//! other-payment invoice tables. Uniqueness that must ignore soft-deleted rows
//! is expressed as partial unique indexes; the constraint names here are the
//! ones `crate::constraint` translates into domain errors.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: STUDENTS & ENROLLMENTS
        // ============================================================
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(ENROLLMENTS_SQL).await?;
        db.execute_unprepared(DISCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: PAYMENTS
        // ============================================================
        db.execute_unprepared(TUITION_INVOICES_SQL).await?;
        db.execute_unprepared(OTHER_INVOICES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE gender AS ENUM ('male', 'female');

CREATE TYPE grade_level AS ENUM (
    'nursery-1',
    'nursery-2',
    'kinder-1',
    'kinder-2',
    'grade-1',
    'grade-2',
    'grade-3',
    'grade-4',
    'grade-5',
    'grade-6'
);

CREATE TYPE enrollment_type AS ENUM ('new', 'old');

CREATE TYPE discount_type AS ENUM (
    'rank_1',
    'sibling',
    'full_year',
    'scholar',
    'carpool'
);

CREATE TYPE discount_scope AS ENUM ('lms_books', 'tuition', 'carpool');

CREATE TYPE payment_method AS ENUM ('cash', 'g-cash', 'bank');

CREATE TYPE other_payment_category AS ENUM (
    'enrollment_fee',
    'pta_fee',
    'misc_fee',
    'lms_fee',
    'pe_shirt',
    'pe_pants',
    'id',
    'patch',
    'carpool',
    'others'
);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    first_name VARCHAR(100) NOT NULL,
    middle_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    suffix VARCHAR(10) NOT NULL DEFAULT '',
    gender gender NOT NULL,
    birthdate DATE NOT NULL,
    address TEXT NOT NULL,
    mother_name VARCHAR(100) NOT NULL DEFAULT '',
    mother_job VARCHAR(100) NOT NULL DEFAULT '',
    mother_education VARCHAR(100) NOT NULL DEFAULT '',
    father_name VARCHAR(100) NOT NULL DEFAULT '',
    father_job VARCHAR(100) NOT NULL DEFAULT '',
    father_education VARCHAR(100) NOT NULL DEFAULT '',
    contact_numbers TEXT[] NOT NULL DEFAULT '{}',
    living_with VARCHAR(100) NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE UNIQUE INDEX idx_unique_student_identity
    ON students (first_name, middle_name, last_name, suffix, gender, birthdate)
    WHERE deleted_at IS NULL;

CREATE INDEX idx_students_last_first ON students (last_name, first_name) WHERE deleted_at IS NULL;
";

const ENROLLMENTS_SQL: &str = r"
CREATE TABLE enrollments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id),
    school_year VARCHAR(9) NOT NULL,
    grade_level grade_level NOT NULL,
    enrollment_type enrollment_type NOT NULL,
    monthly_tuition NUMERIC(19, 4) NOT NULL,
    months INTEGER NOT NULL DEFAULT 10,
    enrollment_fee NUMERIC(19, 4) NOT NULL,
    misc_fee NUMERIC(19, 4) NOT NULL,
    pta_fee NUMERIC(19, 4) NOT NULL,
    lms_books_fee NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT check_positive_fees CHECK (
        monthly_tuition > 0
        AND enrollment_fee > 0
        AND misc_fee > 0
        AND pta_fee > 0
        AND lms_books_fee > 0
    ),
    CONSTRAINT check_months_positive CHECK (months > 0),
    CONSTRAINT check_school_year_format CHECK (school_year ~ '^[0-9]{4}-[0-9]{4}$')
);

CREATE UNIQUE INDEX idx_unique_enrollment_per_school_year
    ON enrollments (student_id, school_year)
    WHERE deleted_at IS NULL;

CREATE INDEX idx_enrollments_student ON enrollments (student_id) WHERE deleted_at IS NULL;
";

const DISCOUNTS_SQL: &str = r"
CREATE TABLE discounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enrollment_id UUID NOT NULL REFERENCES enrollments(id),
    type discount_type NOT NULL,
    scope discount_scope NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT check_discount_amount CHECK (amount >= 0)
);

CREATE UNIQUE INDEX idx_unique_active_discount
    ON discounts (enrollment_id, type, scope)
    WHERE deleted_at IS NULL;
";

const TUITION_INVOICES_SQL: &str = r"
CREATE TABLE tuition_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enrollment_id UUID NOT NULL REFERENCES enrollments(id),
    payment_method payment_method NOT NULL,
    payment_date DATE NOT NULL,
    invoice_number VARCHAR(100) NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT tuition_invoices_invoice_number_key UNIQUE (invoice_number)
);

CREATE INDEX idx_tuition_invoices_enrollment ON tuition_invoices (enrollment_id) WHERE deleted_at IS NULL;

CREATE TABLE tuition_invoice_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES tuition_invoices(id),
    type VARCHAR(20) NOT NULL DEFAULT 'tuition',
    amount NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT check_tuition_item_amount CHECK (amount > 0)
);

CREATE INDEX idx_tuition_invoice_items_invoice ON tuition_invoice_items (invoice_id) WHERE deleted_at IS NULL;
";

const OTHER_INVOICES_SQL: &str = r"
CREATE TABLE other_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enrollment_id UUID NOT NULL REFERENCES enrollments(id),
    payment_method payment_method NOT NULL,
    payment_date DATE NOT NULL,
    invoice_number VARCHAR(100) NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT other_invoices_invoice_number_key UNIQUE (invoice_number)
);

CREATE INDEX idx_other_invoices_enrollment ON other_invoices (enrollment_id) WHERE deleted_at IS NULL;

CREATE TABLE other_invoice_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES other_invoices(id),
    category other_payment_category NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    remarks TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,

    CONSTRAINT check_other_item_amount CHECK (amount > 0)
);

CREATE INDEX idx_other_invoice_items_invoice ON other_invoice_items (invoice_id) WHERE deleted_at IS NULL;
";

const DROP_ALL_SQL: &str = r"
-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS other_invoice_items CASCADE;
DROP TABLE IF EXISTS other_invoices CASCADE;
DROP TABLE IF EXISTS tuition_invoice_items CASCADE;
DROP TABLE IF EXISTS tuition_invoices CASCADE;
DROP TABLE IF EXISTS discounts CASCADE;
DROP TABLE IF EXISTS enrollments CASCADE;
DROP TABLE IF EXISTS students CASCADE;

-- Drop types
DROP TYPE IF EXISTS other_payment_category;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS discount_scope;
DROP TYPE IF EXISTS discount_type;
DROP TYPE IF EXISTS enrollment_type;
DROP TYPE IF EXISTS grade_level;
DROP TYPE IF EXISTS gender;
";
