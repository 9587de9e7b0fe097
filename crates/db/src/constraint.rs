//! Translation of storage constraint violations.
//!
//! The driver reports which constraint a failed statement violated. That
//! name is looked up in [`CONSTRAINTS`]; repositories then map the result to
//! their own error type. Message text is never inspected.

use sea_orm::{DbErr, RuntimeErr};

/// Named constraints the schema declares and callers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// No two active students share name parts, gender and birthdate.
    StudentIdentity,
    /// One active enrollment per student and school year.
    EnrollmentPerSchoolYear,
    /// Every fee component is strictly positive.
    PositiveFees,
    /// One active discount per enrollment, type and scope.
    ActiveDiscount,
    /// Tuition invoice numbers are unique.
    TuitionInvoiceNumber,
    /// Other-payment invoice numbers are unique.
    OtherInvoiceNumber,
}

/// Constraint name to [`Constraint`] lookup table.
pub const CONSTRAINTS: [(&str, Constraint); 6] = [
    ("idx_unique_student_identity", Constraint::StudentIdentity),
    ("idx_unique_enrollment_per_school_year", Constraint::EnrollmentPerSchoolYear),
    ("check_positive_fees", Constraint::PositiveFees),
    ("idx_unique_active_discount", Constraint::ActiveDiscount),
    ("tuition_invoices_invoice_number_key", Constraint::TuitionInvoiceNumber),
    ("other_invoices_invoice_number_key", Constraint::OtherInvoiceNumber),
];

impl Constraint {
    /// Looks up a constraint by its schema name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        CONSTRAINTS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, constraint)| *constraint)
    }

    /// Schema name of the constraint.
    #[must_use]
    pub fn name(self) -> &'static str {
        CONSTRAINTS
            .iter()
            .find(|(_, constraint)| *constraint == self)
            .map_or("", |(name, _)| name)
    }
}

/// Name of the constraint a failed statement violated, as the driver reports it.
#[must_use]
pub fn constraint_name(err: &DbErr) -> Option<&str> {
    let runtime = match err {
        DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => db_err.constraint(),
        _ => None,
    }
}

/// The known constraint a failed statement violated, if any.
#[must_use]
pub fn violated(err: &DbErr) -> Option<Constraint> {
    constraint_name(err).and_then(Constraint::from_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("idx_unique_student_identity", Constraint::StudentIdentity)]
    #[case("idx_unique_enrollment_per_school_year", Constraint::EnrollmentPerSchoolYear)]
    #[case("check_positive_fees", Constraint::PositiveFees)]
    #[case("idx_unique_active_discount", Constraint::ActiveDiscount)]
    #[case("tuition_invoices_invoice_number_key", Constraint::TuitionInvoiceNumber)]
    #[case("other_invoices_invoice_number_key", Constraint::OtherInvoiceNumber)]
    fn test_lookup_round_trips(#[case] name: &str, #[case] constraint: Constraint) {
        assert_eq!(Constraint::from_name(name), Some(constraint));
        assert_eq!(constraint.name(), name);
    }

    #[test]
    fn test_unknown_constraint() {
        assert_eq!(Constraint::from_name("students_pkey"), None);
    }

    #[test]
    fn test_non_driver_errors_carry_no_constraint() {
        assert_eq!(violated(&DbErr::RecordNotFound("x".to_string())), None);
        assert_eq!(
            violated(&DbErr::Query(RuntimeErr::Internal("boom".to_string()))),
            None
        );
    }
}
