//! Invoice records and the paid/unpaid transition
//!
//! Payment state only moves through [`PaymentUpdate::resolve`]:
//! - Unpaid -> Paid stamps `paid_date` with today
//! - Paid -> Unpaid clears `paid_date`
//! - Paid -> Paid keeps the original `paid_date`

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Company, ValidationError};

/// Digits after the decimal point in the `amt` column
const AMOUNT_SCALE: u32 = 2;

/// Largest magnitude `NUMERIC(10, 2)` holds, as shown in error messages
const AMOUNT_MAX_TEXT: &str = "99999999.99";

fn amount_max() -> Decimal {
    Decimal::new(9_999_999_999, AMOUNT_SCALE)
}

/// Round an amount to cents the way Postgres stores `NUMERIC(10, 2)`
/// (halves away from zero) and reject amounts the column can't hold.
pub fn normalize_amount(amt: Decimal) -> Result<Decimal, ValidationError> {
    let rounded = amt.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.abs() > amount_max() {
        return Err(ValidationError::OutOfRange {
            field: "amt",
            max: AMOUNT_MAX_TEXT,
        });
    }
    Ok(rounded)
}

/// Invoice row as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: Decimal,
    pub add_date: NaiveDate,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
}

impl Invoice {
    pub fn payment_state(&self) -> PaymentState {
        PaymentState {
            paid: self.paid,
            paid_date: self.paid_date,
        }
    }

    /// Attach the owning company, producing the API shape.
    pub fn with_company(self, company: Company) -> InvoiceDetail {
        InvoiceDetail {
            id: self.id,
            amt: self.amt,
            add_date: self.add_date,
            paid: self.paid,
            paid_date: self.paid_date,
            company,
        }
    }
}

/// Sparse listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice joined with its company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amt: Decimal,
    pub add_date: NaiveDate,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

/// Insert payload for an invoice; unset optionals take the table defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: Decimal,
    pub add_date: Option<NaiveDate>,
    pub paid: Option<bool>,
    pub paid_date: Option<NaiveDate>,
}

/// Paid flag plus payment date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentState {
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
}

/// Update payload for an invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub amt: Decimal,
    /// `None` leaves the payment state untouched
    pub paid: Option<bool>,
}

impl PaymentUpdate {
    /// Compute the payment state after applying this update.
    pub fn resolve(&self, current: PaymentState, today: NaiveDate) -> PaymentState {
        match self.paid {
            None => current,
            Some(false) => PaymentState {
                paid: false,
                paid_date: None,
            },
            Some(true) => PaymentState {
                paid: true,
                paid_date: current.paid_date.or(Some(today)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn update(paid: Option<bool>) -> PaymentUpdate {
        PaymentUpdate {
            amt: dec!(150),
            paid,
        }
    }

    const UNPAID: PaymentState = PaymentState {
        paid: false,
        paid_date: None,
    };

    #[test]
    fn paying_stamps_today() {
        let today = day(2024, 3, 1);
        let next = update(Some(true)).resolve(UNPAID, today);
        assert_eq!(
            next,
            PaymentState {
                paid: true,
                paid_date: Some(today)
            }
        );
    }

    #[test]
    fn repaying_keeps_original_date() {
        let paid = PaymentState {
            paid: true,
            paid_date: Some(day(2018, 1, 1)),
        };
        let next = update(Some(true)).resolve(paid, day(2024, 3, 1));
        assert_eq!(next, paid);
    }

    #[test]
    fn unpaying_always_clears_date() {
        let paid = PaymentState {
            paid: true,
            paid_date: Some(day(2018, 1, 1)),
        };
        assert_eq!(update(Some(false)).resolve(paid, day(2024, 3, 1)), UNPAID);

        // stale date on an unpaid invoice is cleared too
        let stale = PaymentState {
            paid: false,
            paid_date: Some(day(2018, 1, 1)),
        };
        assert_eq!(update(Some(false)).resolve(stale, day(2024, 3, 1)), UNPAID);
    }

    #[test]
    fn absent_paid_leaves_state() {
        let paid = PaymentState {
            paid: true,
            paid_date: Some(day(2018, 1, 1)),
        };
        assert_eq!(update(None).resolve(paid, day(2024, 3, 1)), paid);
        assert_eq!(update(None).resolve(UNPAID, day(2024, 3, 1)), UNPAID);
    }

    #[test]
    fn amounts_round_half_away_from_zero() {
        assert_eq!(normalize_amount(dec!(0.125)), Ok(dec!(0.13)));
        assert_eq!(normalize_amount(dec!(2.345)), Ok(dec!(2.35)));
        assert_eq!(normalize_amount(dec!(-2.345)), Ok(dec!(-2.35)));
        assert_eq!(normalize_amount(dec!(100)), Ok(dec!(100)));
    }

    #[test]
    fn amounts_bounded_by_column_precision() {
        assert_eq!(normalize_amount(dec!(99999999.99)), Ok(dec!(99999999.99)));
        assert!(normalize_amount(dec!(99999999.995)).is_err());
        assert!(normalize_amount(dec!(100000000)).is_err());
        assert_eq!(
            normalize_amount(dec!(1000000000000)),
            Err(ValidationError::OutOfRange {
                field: "amt",
                max: "99999999.99"
            })
        );
    }

    #[test]
    fn detail_serializes_amount_as_number() {
        let detail = Invoice {
            id: 1,
            comp_code: "apple".into(),
            amt: dec!(100.00),
            add_date: day(2024, 3, 1),
            paid: false,
            paid_date: None,
        }
        .with_company(Company {
            code: "apple".into(),
            name: "Apple Computer".into(),
            description: Some("Maker of OSX.".into()),
        });

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["amt"], serde_json::json!(100.0));
        assert_eq!(json["add_date"], "2024-03-01");
        assert_eq!(json["paid_date"], serde_json::Value::Null);
        assert_eq!(json["company"]["code"], "apple");
        assert!(json.get("comp_code").is_none());
    }
}
