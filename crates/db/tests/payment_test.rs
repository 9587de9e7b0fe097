//! Integration tests for payment recording and listing.

mod common;

use bursar_core::financial::PaymentStatus;
use bursar_core::payment::{
    OtherPaymentCategory, OtherPaymentInput, OtherPaymentItem, PaymentInput, PaymentMethod,
    TuitionPaymentInput,
};
use bursar_db::repositories::{PaymentError, PaymentKind};
use bursar_db::{EnrollmentRepository, FinancialRepository, PaymentRepository};
use bursar_shared::types::EnrollmentId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{STATEMENT_TIMEOUT, invoice_number, new_enrollment, profile};

fn header(day: u32, number: String) -> PaymentInput {
    PaymentInput {
        payment_method: PaymentMethod::GCash,
        payment_date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
        invoice_number: number,
        notes: "first quarter".to_string(),
    }
}

fn item(category: OtherPaymentCategory, amount: Decimal) -> OtherPaymentItem {
    OtherPaymentItem {
        category,
        amount,
        remarks: String::new(),
    }
}

#[tokio::test]
async fn test_other_payments_count_only_fee_categories() {
    let Some(db) = common::setup().await else { return };
    let enrollments = EnrollmentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let payments = PaymentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let financials = FinancialRepository::new(db, STATEMENT_TIMEOUT);

    let created = enrollments
        .create(new_enrollment(profile(), &[]))
        .await
        .unwrap();
    let id = EnrollmentId::from_uuid(created.enrollment.id);

    let record = payments
        .record_other(
            id,
            &OtherPaymentInput {
                invoice: header(2, invoice_number()),
                items: vec![
                    item(OtherPaymentCategory::EnrollmentFee, dec!(4000)),
                    item(OtherPaymentCategory::PtaFee, dec!(300)),
                    item(OtherPaymentCategory::PeShirt, dec!(350)),
                    item(OtherPaymentCategory::Carpool, dec!(1500)),
                ],
            },
        )
        .await
        .unwrap();
    assert_eq!(record.kind, PaymentKind::Other);
    assert_eq!(record.items.len(), 4);
    assert_eq!(record.total, dec!(6150));

    let details = financials.get_financials(id).await.unwrap();
    assert_eq!(details.summary.total_paid, dec!(4300));
    assert_eq!(details.summary.remaining, dec!(34500));
    assert_eq!(details.summary.payment_status, PaymentStatus::Partial);
}

#[tokio::test]
async fn test_full_payment_reads_paid() {
    let Some(db) = common::setup().await else { return };
    let enrollments = EnrollmentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let payments = PaymentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let financials = FinancialRepository::new(db, STATEMENT_TIMEOUT);

    let created = enrollments
        .create(new_enrollment(profile(), &["rank_1"]))
        .await
        .unwrap();
    let id = EnrollmentId::from_uuid(created.enrollment.id);

    payments
        .record_tuition(
            id,
            &TuitionPaymentInput {
                invoice: header(1, invoice_number()),
                amount: dec!(30800),
            },
        )
        .await
        .unwrap();

    let details = financials.get_financials(id).await.unwrap();
    assert_eq!(details.summary.remaining, dec!(0));
    assert_eq!(details.summary.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_list_payments_newest_first() {
    let Some(db) = common::setup().await else { return };
    let enrollments = EnrollmentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let payments = PaymentRepository::new(db, STATEMENT_TIMEOUT);

    let created = enrollments
        .create(new_enrollment(profile(), &[]))
        .await
        .unwrap();
    let id = EnrollmentId::from_uuid(created.enrollment.id);

    payments
        .record_tuition(
            id,
            &TuitionPaymentInput {
                invoice: header(1, invoice_number()),
                amount: dec!(2600),
            },
        )
        .await
        .unwrap();
    payments
        .record_other(
            id,
            &OtherPaymentInput {
                invoice: header(15, invoice_number()),
                items: vec![item(OtherPaymentCategory::Id, dec!(150))],
            },
        )
        .await
        .unwrap();
    payments
        .record_tuition(
            id,
            &TuitionPaymentInput {
                invoice: header(8, invoice_number()),
                amount: dec!(2600),
            },
        )
        .await
        .unwrap();

    let listed = payments.list(id).await.unwrap();

    let days: Vec<NaiveDate> = listed.iter().map(|p| p.payment_date).collect();
    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 8).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        ]
    );
    assert_eq!(listed[0].kind, PaymentKind::Other);
    assert_eq!(listed[0].items[0].item_type, "id");
    assert_eq!(listed[1].kind, PaymentKind::Tuition);
    assert_eq!(listed[1].items[0].item_type, "tuition");
    assert_eq!(listed[1].total, dec!(2600));
}

#[tokio::test]
async fn test_duplicate_invoice_number_is_rejected() {
    let Some(db) = common::setup().await else { return };
    let enrollments = EnrollmentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let payments = PaymentRepository::new(db, STATEMENT_TIMEOUT);

    let created = enrollments
        .create(new_enrollment(profile(), &[]))
        .await
        .unwrap();
    let id = EnrollmentId::from_uuid(created.enrollment.id);
    let number = invoice_number();

    let payment = TuitionPaymentInput {
        invoice: header(1, number),
        amount: dec!(1000),
    };
    payments.record_tuition(id, &payment).await.unwrap();

    let err = payments.record_tuition(id, &payment).await.unwrap_err();
    assert!(matches!(err, PaymentError::DuplicateInvoice), "{err:?}");

    assert_eq!(payments.list(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_payment_for_deleted_enrollment_is_not_found() {
    let Some(db) = common::setup().await else { return };
    let enrollments = EnrollmentRepository::new(db.clone(), STATEMENT_TIMEOUT);
    let payments = PaymentRepository::new(db, STATEMENT_TIMEOUT);

    let created = enrollments
        .create(new_enrollment(profile(), &[]))
        .await
        .unwrap();
    let id = EnrollmentId::from_uuid(created.enrollment.id);
    enrollments.delete(id).await.unwrap();

    let err = payments
        .record_tuition(
            id,
            &TuitionPaymentInput {
                invoice: header(1, invoice_number()),
                amount: dec!(1000),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::NotFound(missing) if missing == id));
    assert!(matches!(
        payments.list(id).await.unwrap_err(),
        PaymentError::NotFound(_)
    ));
}
