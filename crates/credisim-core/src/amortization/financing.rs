//! Resolve the financed principal from an asset price and a down payment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CredisimError;
use crate::types::{Money, Rate};
use crate::CredisimResult;

/// Lenders typically finance at most 80% of the asset value.
pub const DEFAULT_MAX_FINANCING_RATIO: Rate = dec!(0.80);

fn default_max_financing_ratio() -> Rate {
    DEFAULT_MAX_FINANCING_RATIO
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingInput {
    /// Purchase price of the asset.
    pub asset_value: Money,
    /// Cash paid up front.
    pub down_payment: Money,
    /// Largest share of the asset value the lender will finance.
    #[serde(default = "default_max_financing_ratio")]
    pub max_financing_ratio: Rate,
}

/// Financed amount `asset_value - down_payment`, checked against the
/// lender's maximum financing ratio.
pub fn financed_principal(input: &FinancingInput) -> CredisimResult<Money> {
    if input.asset_value <= Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "asset_value".into(),
            reason: "Asset value must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.max_financing_ratio <= Decimal::ZERO || input.max_financing_ratio > Decimal::ONE {
        return Err(CredisimError::InvalidInput {
            field: "max_financing_ratio".into(),
            reason: "Maximum financing ratio must be in (0, 1]".into(),
        });
    }

    let financed = input.asset_value - input.down_payment;
    if financed <= Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment covers the whole asset; nothing to finance".into(),
        });
    }

    let cap = input.asset_value * input.max_financing_ratio;
    if financed > cap {
        return Err(CredisimError::InvalidInput {
            field: "down_payment".into(),
            reason: format!(
                "Financed amount {} exceeds {}% of the asset value ({})",
                financed,
                (input.max_financing_ratio * dec!(100)).normalize(),
                cap
            ),
        });
    }

    Ok(financed)
}
