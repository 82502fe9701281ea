//! Head-to-head recommendation between financing and a consortium plan.
//!
//! Additive criterion score: each criterion awards its weight to the product
//! that strictly wins it, independently of the others. The product with the
//! strictly higher total is recommended; ties go to [`TIE_BREAK_PRODUCT`].

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

use crate::amortization::LoanSchedule;
use crate::consortium::ConsortiumResult;
use crate::error::CredisimError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Product};
use crate::CredisimResult;

pub const STANDARD_WEIGHTS_VERSION: &str = "standard-v1";

/// Financing hands over the credit immediately, so it wins ties.
pub const TIE_BREAK_PRODUCT: Product = Product::Financing;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub version: String,
    /// Lower total cost.
    pub cost: Decimal,
    /// Lower first (financing) vs. base (consortium) installment.
    pub installment: Decimal,
    /// Shorter term.
    pub term: Decimal,
    /// Awarded to financing when the consortium contemplation estimate is
    /// below `access_threshold_pct`, otherwise to the consortium.
    pub access: Decimal,
    pub access_threshold_pct: Percent,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringWeights {
    pub fn standard() -> Self {
        ScoringWeights {
            version: STANDARD_WEIGHTS_VERSION.into(),
            cost: dec!(3),
            installment: dec!(2),
            term: dec!(1),
            access: dec!(1),
            access_threshold_pct: dec!(50),
        }
    }

    pub fn validate(&self) -> CredisimResult<()> {
        let weights = [
            ("weights.cost", self.cost),
            ("weights.installment", self.installment),
            ("weights.term", self.term),
            ("weights.access", self.access),
        ];
        for (field, w) in weights {
            if w < Decimal::ZERO {
                return Err(CredisimError::InvalidInput {
                    field: field.into(),
                    reason: "Weights cannot be negative".into(),
                });
            }
        }
        if self.access_threshold_pct < Decimal::ZERO || self.access_threshold_pct > dec!(100) {
            return Err(CredisimError::InvalidInput {
                field: "weights.access_threshold_pct".into(),
                reason: "Threshold must lie between 0 and 100".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Cost,
    Installment,
    Term,
    Access,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionOutcome {
    pub criterion: Criterion,
    pub financing_value: Decimal,
    pub consortium_value: Decimal,
    /// `None` when the criterion is level.
    pub winner: Option<Product>,
    pub weight: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub financing_score: Decimal,
    pub consortium_score: Decimal,
    pub criteria: Vec<CriterionOutcome>,
    pub financing_total_cost: Money,
    pub consortium_total_cost: Money,
    /// financing − consortium total cost. Positive means the consortium is cheaper.
    pub cost_difference: Money,
    pub recommended: Product,
    pub recommended_label: String,
    /// True when the scores were level and the tie-break decided.
    pub tie_broken: bool,
    pub weights_version: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score both products from their already computed results.
pub fn compare_strategies(
    schedule: &LoanSchedule,
    consortium: &ConsortiumResult,
    loan_term: u32,
    consortium_term: u32,
    weights: &ScoringWeights,
) -> CredisimResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if loan_term == 0 {
        return Err(CredisimError::InvalidInput {
            field: "loan_term".into(),
            reason: "Loan term must be at least 1 month".into(),
        });
    }
    if consortium_term == 0 {
        return Err(CredisimError::InvalidInput {
            field: "consortium_term".into(),
            reason: "Consortium term must be at least 1 month".into(),
        });
    }
    weights.validate()?;

    let contemplation_estimate = consortium.contemplation.estimate_pct;
    let criteria = vec![
        lower_wins(
            Criterion::Cost,
            schedule.total_paid,
            consortium.total_cost,
            weights.cost,
        ),
        lower_wins(
            Criterion::Installment,
            schedule.first_installment,
            consortium.base_installment,
            weights.installment,
        ),
        lower_wins(
            Criterion::Term,
            Decimal::from(loan_term),
            Decimal::from(consortium_term),
            weights.term,
        ),
        CriterionOutcome {
            criterion: Criterion::Access,
            financing_value: dec!(100),
            consortium_value: contemplation_estimate,
            winner: Some(if contemplation_estimate < weights.access_threshold_pct {
                Product::Financing
            } else {
                Product::Consortium
            }),
            weight: weights.access,
        },
    ];

    let score_for = |product: Product| -> Decimal {
        criteria
            .iter()
            .filter(|c| c.winner == Some(product))
            .map(|c| c.weight)
            .sum()
    };
    let financing_score = score_for(Product::Financing);
    let consortium_score = score_for(Product::Consortium);

    let (recommended, tie_broken) = match financing_score.cmp(&consortium_score) {
        Ordering::Greater => (Product::Financing, false),
        Ordering::Less => (Product::Consortium, false),
        Ordering::Equal => (TIE_BREAK_PRODUCT, true),
    };

    if tie_broken {
        warnings.push(format!(
            "Scores are level at {}; defaulting to {}",
            financing_score,
            TIE_BREAK_PRODUCT.label()
        ));
    }
    if consortium.contemplation_month > consortium_term {
        warnings.push(format!(
            "Target contemplation month {} falls after the consortium term {}",
            consortium.contemplation_month, consortium_term
        ));
    }

    debug!(
        "comparison: financing={} consortium={} recommended={:?}",
        financing_score, consortium_score, recommended
    );

    let output = ComparisonResult {
        financing_score,
        consortium_score,
        criteria,
        financing_total_cost: schedule.total_paid,
        consortium_total_cost: consortium.total_cost,
        cost_difference: schedule.total_paid - consortium.total_cost,
        recommended,
        recommended_label: recommended.label().to_string(),
        tie_broken,
        weights_version: weights.version.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Additive criterion score — cost, installment, term, access",
        &serde_json::json!({
            "loan_term": loan_term,
            "consortium_term": consortium_term,
            "weights_version": weights.version,
            "tie_break": TIE_BREAK_PRODUCT,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn lower_wins(
    criterion: Criterion,
    financing_value: Decimal,
    consortium_value: Decimal,
    weight: Decimal,
) -> CriterionOutcome {
    let winner = match financing_value.cmp(&consortium_value) {
        Ordering::Less => Some(Product::Financing),
        Ordering::Greater => Some(Product::Consortium),
        Ordering::Equal => None,
    };
    CriterionOutcome {
        criterion,
        financing_value,
        consortium_value,
        winner,
        weight,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
