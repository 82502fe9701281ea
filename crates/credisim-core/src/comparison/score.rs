//! Single-product strategy score on a 0–100 scale.
//!
//! Used when there is no second product to compare against: the score starts
//! at 100 and loses points in proportion to total cost, installment size and
//! term length.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanSchedule;
use crate::consortium::ConsortiumResult;
use crate::error::CredisimError;
use crate::types::{with_metadata, ComputationOutput, Money, Product};
use crate::CredisimResult;

const MAX_SCORE: Decimal = dec!(100);

/// Penalty of `weight` points per `reference` units of each measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyScorePolicy {
    pub version: String,
    pub cost_reference: Money,
    pub cost_weight: Decimal,
    pub installment_reference: Money,
    pub installment_weight: Decimal,
    pub term_reference_months: u32,
    pub term_weight: Decimal,
}

impl Default for StrategyScorePolicy {
    fn default() -> Self {
        StrategyScorePolicy {
            version: "standard-v1".into(),
            cost_reference: dec!(100000),
            cost_weight: dec!(4),
            installment_reference: dec!(1000),
            installment_weight: dec!(3),
            term_reference_months: 12,
            term_weight: dec!(1.5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleProductInput {
    pub product: Product,
    pub total_cost: Money,
    pub installment: Money,
    pub term_months: u32,
}

impl SingleProductInput {
    pub fn from_schedule(schedule: &LoanSchedule) -> Self {
        SingleProductInput {
            product: Product::Financing,
            total_cost: schedule.total_paid,
            installment: schedule.first_installment,
            term_months: schedule.term_months,
        }
    }

    pub fn from_consortium(result: &ConsortiumResult) -> Self {
        SingleProductInput {
            product: Product::Consortium,
            total_cost: result.total_cost,
            installment: result.base_installment,
            term_months: result.bid_reduction.term_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyScore {
    pub product: Product,
    /// Clamped to [0, 100].
    pub score: Decimal,
    pub cost_penalty: Decimal,
    pub installment_penalty: Decimal,
    pub term_penalty: Decimal,
    pub policy_version: String,
}

pub fn score_single_product(
    input: &SingleProductInput,
    policy: &StrategyScorePolicy,
) -> CredisimResult<ComputationOutput<StrategyScore>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input, policy)?;

    let cost_penalty = input.total_cost / policy.cost_reference * policy.cost_weight;
    let installment_penalty =
        input.installment / policy.installment_reference * policy.installment_weight;
    let term_penalty = Decimal::from(input.term_months)
        / Decimal::from(policy.term_reference_months)
        * policy.term_weight;

    let raw = MAX_SCORE - cost_penalty - installment_penalty - term_penalty;
    if raw < Decimal::ZERO {
        warnings.push(format!(
            "Penalties exceed 100 points ({}); score floored at 0",
            raw.round_dp(2)
        ));
    }
    let score = raw.max(Decimal::ZERO).min(MAX_SCORE);

    let output = StrategyScore {
        product: input.product,
        score,
        cost_penalty,
        installment_penalty,
        term_penalty,
        policy_version: policy.version.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Single-product strategy score — 100 minus proportional penalties",
        &serde_json::json!({
            "product": input.product,
            "total_cost": input.total_cost.to_string(),
            "installment": input.installment.to_string(),
            "term_months": input.term_months,
            "policy_version": policy.version,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate(input: &SingleProductInput, policy: &StrategyScorePolicy) -> CredisimResult<()> {
    if input.total_cost < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "total_cost".into(),
            reason: "Total cost cannot be negative".into(),
        });
    }
    if input.installment < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "installment".into(),
            reason: "Installment cannot be negative".into(),
        });
    }
    if policy.cost_reference <= Decimal::ZERO
        || policy.installment_reference <= Decimal::ZERO
        || policy.term_reference_months == 0
    {
        return Err(CredisimError::DivisionByZero {
            context: "strategy score reference values".into(),
        });
    }
    if policy.cost_weight < Decimal::ZERO
        || policy.installment_weight < Decimal::ZERO
        || policy.term_weight < Decimal::ZERO
    {
        return Err(CredisimError::InvalidInput {
            field: "score_policy".into(),
            reason: "Penalty weights cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(total_cost: Money, installment: Money, term_months: u32) -> SingleProductInput {
        SingleProductInput {
            product: Product::Consortium,
            total_cost,
            installment,
            term_months,
        }
    }

    #[test]
    fn test_penalties_are_proportional() {
        let policy = StrategyScorePolicy::default();
        let out = score_single_product(&input(dec!(200000), dec!(2000), 24), &policy)
            .unwrap()
            .result;

        assert_eq!(out.cost_penalty, dec!(8));
        assert_eq!(out.installment_penalty, dec!(6));
        assert_eq!(out.term_penalty, dec!(3));
        assert_eq!(out.score, dec!(83));
    }

    #[test]
    fn test_score_floors_at_zero() {
        let result = score_single_product(
            &input(dec!(5000000), dec!(20000), 420),
            &StrategyScorePolicy::default(),
        )
        .unwrap();

        assert_eq!(result.result.score, Decimal::ZERO);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_cheaper_product_scores_higher() {
        let policy = StrategyScorePolicy::default();
        let cheap = score_single_product(&input(dec!(300000), dec!(1500), 120), &policy).unwrap();
        let dear = score_single_product(&input(dec!(450000), dec!(1500), 120), &policy).unwrap();
        assert!(cheap.result.score > dear.result.score);
    }

    #[test]
    fn test_zero_reference_is_division_by_zero() {
        let mut policy = StrategyScorePolicy::default();
        policy.term_reference_months = 0;

        let err = score_single_product(&input(dec!(1000), dec!(100), 12), &policy).unwrap_err();
        assert!(matches!(err, CredisimError::DivisionByZero { .. }));
    }
}
