use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::CredisimError;
use crate::types::{Money, Rate};
use crate::CredisimResult;

/// Compound growth factor `(1 + rate)^nper`. Fails when the factor leaves
/// the range of `Decimal`.
pub fn compound_factor(rate: Rate, nper: u32) -> CredisimResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(nper as i64)
        .ok_or_else(|| out_of_range(rate, nper))
}

/// Level payment that amortizes `present_value` over `nper` periods.
///
/// Returned as a positive amount (the borrower's periodic installment), unlike
/// the spreadsheet sign convention. A zero rate has no annuity factor and is
/// reported as a division by zero rather than silently falling back to
/// straight-line repayment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money) -> CredisimResult<Money> {
    if nper == 0 {
        return Err(CredisimError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = factor - Decimal::ONE;

    if rate.is_zero() || annuity_factor.is_zero() {
        return Err(CredisimError::DivisionByZero {
            context: "PMT annuity factor at zero rate".into(),
        });
    }

    present_value
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(annuity_factor))
        .ok_or_else(|| out_of_range(rate, nper))
}

fn out_of_range(rate: Rate, nper: u32) -> CredisimError {
    CredisimError::InvalidInput {
        field: "monthly_rate".into(),
        reason: format!("(1 + {rate})^{nper} is outside the supported numeric range"),
    }
}
