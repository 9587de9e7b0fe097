//! Payment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enrollment::{ValidationError, Validator};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash at the cashier.
    #[serde(rename = "cash")]
    Cash,
    /// GCash mobile wallet.
    #[serde(rename = "g-cash")]
    GCash,
    /// Bank transfer or deposit.
    #[serde(rename = "bank")]
    Bank,
}

impl PaymentMethod {
    /// Returns the payload/storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::GCash => "g-cash",
            Self::Bank => "bank",
        }
    }

    /// Parses a method code, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "g-cash" => Some(Self::GCash),
            "bank" => Some(Self::Bank),
            _ => None,
        }
    }
}

/// Category of a non-tuition payment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherPaymentCategory {
    /// Enrollment fee.
    EnrollmentFee,
    /// PTA fee.
    PtaFee,
    /// Miscellaneous fee.
    MiscFee,
    /// LMS/books fee.
    LmsFee,
    /// PE shirt.
    PeShirt,
    /// PE pants.
    PePants,
    /// School ID.
    Id,
    /// Uniform patch.
    Patch,
    /// Carpool service.
    Carpool,
    /// Anything else.
    Others,
}

impl OtherPaymentCategory {
    /// All categories.
    pub const ALL: [Self; 10] = [
        Self::EnrollmentFee,
        Self::PtaFee,
        Self::MiscFee,
        Self::LmsFee,
        Self::PeShirt,
        Self::PePants,
        Self::Id,
        Self::Patch,
        Self::Carpool,
        Self::Others,
    ];

    /// Returns the payload/storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnrollmentFee => "enrollment_fee",
            Self::PtaFee => "pta_fee",
            Self::MiscFee => "misc_fee",
            Self::LmsFee => "lms_fee",
            Self::PeShirt => "pe_shirt",
            Self::PePants => "pe_pants",
            Self::Id => "id",
            Self::Patch => "patch",
            Self::Carpool => "carpool",
            Self::Others => "others",
        }
    }

    /// Parses a category code, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Whether payments in this category reduce the enrollment balance.
    ///
    /// Only fee components that make up the amount due count.
    #[must_use]
    pub const fn counts_toward_balance(self) -> bool {
        matches!(
            self,
            Self::EnrollmentFee | Self::PtaFee | Self::MiscFee | Self::LmsFee
        )
    }

    /// Categories that count toward the balance.
    #[must_use]
    pub fn balance_categories() -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|c| c.counts_toward_balance())
            .collect()
    }
}

/// Invoice header shared by tuition and other payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Receipt number, unique per invoice table.
    pub invoice_number: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A tuition payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionPaymentInput {
    /// Invoice header.
    #[serde(flatten)]
    pub invoice: PaymentInput,
    /// Amount paid.
    pub amount: Decimal,
}

/// One line of a non-tuition payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPaymentItem {
    /// Category.
    pub category: OtherPaymentCategory,
    /// Amount paid.
    pub amount: Decimal,
    /// Optional remarks.
    #[serde(default)]
    pub remarks: String,
}

/// A non-tuition payment with one or more items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPaymentInput {
    /// Invoice header.
    #[serde(flatten)]
    pub invoice: PaymentInput,
    /// Items paid for.
    pub items: Vec<OtherPaymentItem>,
}

impl Validator {
    /// Checks an invoice header.
    pub fn invoice(&self, invoice: &PaymentInput, today: NaiveDate) -> Result<(), ValidationError> {
        if invoice.invoice_number.trim().is_empty() {
            return Err(ValidationError::Field {
                field: "invoice_number",
                reason: "is required",
            });
        }
        self.text("invoice_number", &invoice.invoice_number)?;
        if invoice.payment_date > today {
            return Err(ValidationError::Field {
                field: "payment_date",
                reason: "must not be in the future",
            });
        }
        Ok(())
    }

    /// Checks a tuition payment.
    pub fn tuition_payment(
        &self,
        payment: &TuitionPaymentInput,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        self.invoice(&payment.invoice, today)?;
        self.positive_amount("amount", payment.amount)
    }

    /// Checks a non-tuition payment.
    pub fn other_payment(
        &self,
        payment: &OtherPaymentInput,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        self.invoice(&payment.invoice, today)?;
        if payment.items.is_empty() {
            return Err(ValidationError::Field {
                field: "items",
                reason: "must contain at least one item",
            });
        }
        for item in &payment.items {
            self.positive_amount("amount", item.amount)?;
            self.text("remarks", &item.remarks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn invoice() -> PaymentInput {
        PaymentInput {
            payment_method: PaymentMethod::Cash,
            payment_date: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
            invoice_number: "OR-0001".to_string(),
            notes: String::new(),
        }
    }

    #[rstest]
    #[case("cash", Some(PaymentMethod::Cash))]
    #[case("G-Cash", Some(PaymentMethod::GCash))]
    #[case("bank", Some(PaymentMethod::Bank))]
    #[case("cheque", None)]
    fn test_parse_method(#[case] value: &str, #[case] expected: Option<PaymentMethod>) {
        assert_eq!(PaymentMethod::parse(value), expected);
    }

    #[test]
    fn test_balance_categories() {
        assert_eq!(
            OtherPaymentCategory::balance_categories(),
            vec![
                OtherPaymentCategory::EnrollmentFee,
                OtherPaymentCategory::PtaFee,
                OtherPaymentCategory::MiscFee,
                OtherPaymentCategory::LmsFee,
            ]
        );
        assert!(!OtherPaymentCategory::Carpool.counts_toward_balance());
        assert_eq!(OtherPaymentCategory::parse("PE_SHIRT"), Some(OtherPaymentCategory::PeShirt));
    }

    #[test]
    fn test_tuition_payment_validation() {
        let v = Validator::new();
        let mut payment = TuitionPaymentInput {
            invoice: invoice(),
            amount: dec!(10000),
        };
        assert!(v.tuition_payment(&payment, today()).is_ok());

        payment.amount = Decimal::ZERO;
        assert_eq!(
            v.tuition_payment(&payment, today()).unwrap_err().field(),
            Some("amount")
        );

        payment.amount = dec!(1);
        payment.invoice.invoice_number = "  ".to_string();
        assert_eq!(
            v.tuition_payment(&payment, today()).unwrap_err().field(),
            Some("invoice_number")
        );
    }

    #[test]
    fn test_other_payment_validation() {
        let v = Validator::new();
        let mut payment = OtherPaymentInput {
            invoice: invoice(),
            items: vec![],
        };
        assert_eq!(v.other_payment(&payment, today()).unwrap_err().field(), Some("items"));

        payment.items.push(OtherPaymentItem {
            category: OtherPaymentCategory::PeShirt,
            amount: dec!(350),
            remarks: "size M".to_string(),
        });
        assert!(v.other_payment(&payment, today()).is_ok());

        payment.invoice.payment_date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            v.other_payment(&payment, today()).unwrap_err().field(),
            Some("payment_date")
        );
    }

    #[test]
    fn test_method_serde_code() {
        assert_eq!(serde_json::to_string(&PaymentMethod::GCash).unwrap(), "\"g-cash\"");
    }
}
