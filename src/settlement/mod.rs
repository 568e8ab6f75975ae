//! Settlement rules for pickup-and-drop orders.
//!
//! Every order carries a pickup-billing mode (`pb`) and a drop-charge mode
//! (`dc`). Together with the two amounts they determine the settlement balance
//! (`tsb`, what is owed between the courier and the vendor after the order) and
//! the cash in hand (`cid`, cash the rider collected and must remit).
//!
//! The canonical table, rows are `dc` and columns are `pb`:
//!
//! | dc \ pb | COD                   | Prepaid          | Due                  |
//! |---------|-----------------------|------------------|----------------------|
//! | Due     | tsb = pb - dc, cid = pb | tsb = pb - dc, cid = 0 | tsb = -pb - dc, cid = 0 |
//! | Prepaid | tsb = pb, cid = pb    | tsb = 0, cid = 0 | tsb = -dc, cid = dc  |
//! | COD     | tsb = pb, cid = pb + dc | tsb = 0, cid = dc | tsb = dc + pb, cid = dc |

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Payment mode for either leg of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentMode {
    #[sea_orm(string_value = "COD")]
    #[serde(rename = "COD", alias = "cod")]
    Cod,
    #[sea_orm(string_value = "Prepaid")]
    #[serde(rename = "Prepaid", alias = "prepaid")]
    Prepaid,
    #[sea_orm(string_value = "Due")]
    #[serde(rename = "Due", alias = "due")]
    Due,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Cod, PaymentMode::Prepaid, PaymentMode::Due];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cod => "COD",
            PaymentMode::Prepaid => "Prepaid",
            PaymentMode::Due => "Due",
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" => Ok(PaymentMode::Cod),
            "prepaid" => Ok(PaymentMode::Prepaid),
            "due" => Ok(PaymentMode::Due),
            other => Err(ServiceError::ValidationError(format!(
                "Unknown payment mode: {other}"
            ))),
        }
    }
}

/// Derived settlement figures for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Settlement {
    /// Total settlement balance
    pub tsb: Decimal,
    /// Cash in hand
    pub cid: Decimal,
}

/// One named cell of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettlementRule {
    CodDue,
    CodPrepaid,
    CodCod,
    PrepaidDue,
    PrepaidPrepaid,
    PrepaidCod,
    DueDue,
    DuePrepaid,
    DueCod,
}

impl SettlementRule {
    /// Resolves the table cell for a `(pb, dc)` pair.
    pub fn for_modes(pb: PaymentMode, dc: PaymentMode) -> Self {
        use PaymentMode::*;
        match (pb, dc) {
            (Cod, Due) => SettlementRule::CodDue,
            (Cod, Prepaid) => SettlementRule::CodPrepaid,
            (Cod, Cod) => SettlementRule::CodCod,
            (Prepaid, Due) => SettlementRule::PrepaidDue,
            (Prepaid, Prepaid) => SettlementRule::PrepaidPrepaid,
            (Prepaid, Cod) => SettlementRule::PrepaidCod,
            (Due, Due) => SettlementRule::DueDue,
            (Due, Prepaid) => SettlementRule::DuePrepaid,
            (Due, Cod) => SettlementRule::DueCod,
        }
    }

    /// Applies the cell to a pair of amounts.
    pub fn apply(&self, pb_amt: Decimal, dc_amt: Decimal) -> Settlement {
        let zero = Decimal::ZERO;
        let (tsb, cid) = match self {
            SettlementRule::CodDue => (pb_amt - dc_amt, pb_amt),
            SettlementRule::CodPrepaid => (pb_amt, pb_amt),
            SettlementRule::CodCod => (pb_amt, pb_amt + dc_amt),
            SettlementRule::PrepaidDue => (pb_amt - dc_amt, zero),
            SettlementRule::PrepaidPrepaid => (zero, zero),
            SettlementRule::PrepaidCod => (zero, dc_amt),
            // Call sites disagreed on this cell; -pb - dc on tsb is canonical.
            SettlementRule::DueDue => (-pb_amt - dc_amt, zero),
            SettlementRule::DuePrepaid => (-dc_amt, dc_amt),
            SettlementRule::DueCod => (dc_amt + pb_amt, dc_amt),
        };
        Settlement { tsb, cid }
    }
}

/// Evaluates the settlement for an order. Total over every mode combination.
pub fn evaluate(pb: PaymentMode, dc: PaymentMode, pb_amt: Decimal, dc_amt: Decimal) -> Settlement {
    let settlement = SettlementRule::for_modes(pb, dc).apply(pb_amt, dc_amt);
    metrics::counter!("courier_ledger.settlement.evaluated", 1);
    settlement
}

impl Settlement {
    /// Validating variant of [`evaluate`] used at the service boundary.
    pub fn try_evaluate(
        pb: PaymentMode,
        dc: PaymentMode,
        pb_amt: Option<Decimal>,
        dc_amt: Option<Decimal>,
    ) -> Result<Self, ServiceError> {
        let pb_amt = non_negative("pb_amt", pb_amt)?;
        let dc_amt = non_negative("dc_amt", dc_amt)?;
        Ok(evaluate(pb, dc, pb_amt, dc_amt))
    }
}

/// Missing amounts count as zero; negative amounts are rejected.
pub fn non_negative(field: &str, amount: Option<Decimal>) -> Result<Decimal, ServiceError> {
    let amount = amount.unwrap_or(Decimal::ZERO);
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "{field} must not be negative"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cod_pickup_with_due_drop() {
        let s = evaluate(PaymentMode::Cod, PaymentMode::Due, dec!(500), dec!(100));
        assert_eq!(s.tsb, dec!(400));
        assert_eq!(s.cid, dec!(500));
    }

    #[test]
    fn prepaid_both_legs_settles_to_zero() {
        let s = evaluate(
            PaymentMode::Prepaid,
            PaymentMode::Prepaid,
            dec!(300),
            dec!(50),
        );
        assert_eq!(s, Settlement::default());
    }

    #[test]
    fn every_combination_has_a_distinct_rule() {
        let mut seen = std::collections::HashSet::new();
        for pb in PaymentMode::ALL {
            for dc in PaymentMode::ALL {
                assert!(seen.insert(format!("{:?}", SettlementRule::for_modes(pb, dc))));
            }
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn missing_amounts_default_to_zero() {
        let s = Settlement::try_evaluate(PaymentMode::Cod, PaymentMode::Cod, None, Some(dec!(40)))
            .unwrap();
        assert_eq!(s.tsb, dec!(0));
        assert_eq!(s.cid, dec!(40));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Settlement::try_evaluate(
            PaymentMode::Due,
            PaymentMode::Cod,
            Some(dec!(-1)),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(msg) if msg.contains("pb_amt")));
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("cod".parse::<PaymentMode>().unwrap(), PaymentMode::Cod);
        assert_eq!(" Prepaid ".parse::<PaymentMode>().unwrap(), PaymentMode::Prepaid);
        assert!("card".parse::<PaymentMode>().is_err());
    }

    #[test]
    fn mode_serializes_with_upper_label() {
        let json = serde_json::to_string(&PaymentMode::Cod).unwrap();
        assert_eq!(json, "\"COD\"");
        let parsed: PaymentMode = serde_json::from_str("\"due\"").unwrap();
        assert_eq!(parsed, PaymentMode::Due);
    }
}
