use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (BRL). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.012 = 1.2% per month).
pub type Rate = Decimal;

/// Percentages on a 0–100 scale (15 = 15%). Fee and bid inputs use this
/// convention because that is how consultants quote them.
pub type Percent = Decimal;

/// The two credit products under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Conventional amortized loan (financiamento).
    Financing,
    /// Pooled-savings credit group (consórcio).
    Consortium,
}

impl Product {
    pub fn label(&self) -> &'static str {
        match self {
            Product::Financing => "Financing",
            Product::Consortium => "Consortium",
        }
    }

    pub fn other(&self) -> Product {
        match self {
            Product::Financing => Product::Consortium,
            Product::Consortium => Product::Financing,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
