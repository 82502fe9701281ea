pub mod comparison;
pub mod consortium;
pub mod loan;

use log::warn;
use rust_decimal::Decimal;

/// Warn (without failing) when a value falls outside the range the sales
/// team documents for it. The engines accept any valid value.
pub(crate) fn check_documented_range(
    field: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> bool {
    match range_warning(field, value, min, max) {
        Some(message) => {
            warn!("{message}");
            false
        }
        None => true,
    }
}

fn range_warning(field: &str, value: Decimal, min: Decimal, max: Decimal) -> Option<String> {
    if value >= min && value <= max {
        None
    } else {
        Some(format!("{field} = {value} is outside the documented range {min}–{max}"))
    }
}
