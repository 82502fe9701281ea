//! Consortium (consórcio) plan economics.
//!
//! Computes the fee-loaded plan total, the monthly installment, bid (lance)
//! economics for embedded, free and fixed bids, and the effect of applying
//! the bid to either the installment or the remaining term.

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::{BidPolicy, CompetitivenessRanking, ContemplationEstimate};
use crate::error::CredisimError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::CredisimResult;

const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Bid offered to be contemplated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidInput {
    /// Share of the credit letter used as bid (0–100). Reduces the credit received.
    #[serde(default)]
    pub embedded_pct: Percent,
    /// Cash bid paid from the member's own funds.
    #[serde(default)]
    pub free_bid: Money,
    /// Predetermined bid amount set by the group rules.
    #[serde(default)]
    pub fixed_bid: Money,
}

/// What the accepted bid pays down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidReduction {
    /// Keep the term, spread the post-bid balance over it.
    #[default]
    ReduceInstallment,
    /// Keep the installment, shorten the term.
    ReduceTerm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsortiumInput {
    /// Nominal credit letter value.
    pub credit_value: Money,
    pub term_months: u32,
    /// Administrative fee over the whole plan (e.g. 15 = 15%).
    pub admin_fee_pct: Percent,
    /// Reserve fund over the whole plan (e.g. 2 = 2%).
    pub reserve_fund_pct: Percent,
    #[serde(default)]
    pub bid: BidInput,
    /// Month by which the member wants to be contemplated.
    pub contemplation_month: u32,
    #[serde(default)]
    pub bid_reduction: BidReduction,
}

/// Installment and term after the bid is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReductionOutcome {
    pub mode: BidReduction,
    pub installment: Money,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsortiumResult {
    /// (admin fee + reserve fund) as a decimal.
    pub fee_rate: Rate,
    /// credit × (1 + fee_rate).
    pub plan_total: Money,
    /// plan_total / term.
    pub base_installment: Money,
    pub embedded_bid: Money,
    /// embedded + free + fixed.
    pub total_bid: Money,
    /// total_bid as a percentage of the credit value.
    pub bid_pct_of_credit: Percent,
    /// credit − embedded bid.
    pub net_credit_received: Money,
    /// plan_total − total_bid, floored at zero.
    pub post_bid_balance: Money,
    pub bid_reduction: BidReductionOutcome,
    /// Installments paid up to the target contemplation month.
    pub paid_until_contemplation: Money,
    pub contemplation_month: u32,
    /// plan_total + total_bid. Cost basis used when comparing products.
    pub total_cost: Money,
    pub contemplation: ContemplationEstimate,
    pub competitiveness: CompetitivenessRanking,
    /// Advisory bid for the target contemplation month.
    pub recommended_bid_pct: Percent,
    pub policy_version: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute plan economics with the standard bid policy.
pub fn compute_plan_default(
    input: &ConsortiumInput,
) -> CredisimResult<ComputationOutput<ConsortiumResult>> {
    compute_plan(input, &BidPolicy::standard())
}

/// Compute plan economics, bid effects and heuristic rankings.
pub fn compute_plan(
    input: &ConsortiumInput,
    policy: &BidPolicy,
) -> CredisimResult<ComputationOutput<ConsortiumResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_consortium_input(input)?;
    policy.validate()?;

    let credit = input.credit_value;
    let term = Decimal::from(input.term_months);

    let fee_rate = (input.admin_fee_pct + input.reserve_fund_pct) / PERCENT;
    let plan_total = credit * (Decimal::ONE + fee_rate);
    let base_installment = plan_total / term;

    let embedded_bid = credit * input.bid.embedded_pct / PERCENT;
    let net_credit_received = credit - embedded_bid;
    let total_bid = embedded_bid + input.bid.free_bid + input.bid.fixed_bid;
    let bid_pct_of_credit = total_bid / credit * PERCENT;

    let post_bid_balance = if total_bid > plan_total {
        warnings.push(format!(
            "Total bid {} exceeds the plan total {}; post-bid balance floored at zero",
            total_bid.round_dp(2),
            plan_total.round_dp(2)
        ));
        Decimal::ZERO
    } else {
        plan_total - total_bid
    };

    let bid_reduction = match input.bid_reduction {
        BidReduction::ReduceInstallment => BidReductionOutcome {
            mode: BidReduction::ReduceInstallment,
            installment: post_bid_balance / term,
            term_months: input.term_months,
        },
        BidReduction::ReduceTerm => BidReductionOutcome {
            mode: BidReduction::ReduceTerm,
            installment: base_installment,
            term_months: whole_periods(post_bid_balance, base_installment)?,
        },
    };

    let paid_until_contemplation = base_installment * Decimal::from(input.contemplation_month);
    let total_cost = plan_total + total_bid;

    let contemplation =
        policy
            .contemplation(bid_pct_of_credit)
            .ok_or_else(|| CredisimError::InvalidInput {
                field: "policy.probability".into(),
                reason: format!("No band covers a {bid_pct_of_credit}% bid"),
            })?;
    let competitiveness =
        policy
            .competitiveness(bid_pct_of_credit)
            .ok_or_else(|| CredisimError::InvalidInput {
                field: "policy.competitiveness".into(),
                reason: format!("No band covers a {bid_pct_of_credit}% bid"),
            })?;
    let recommended_bid_pct = policy
        .recommended_bid_pct(input.contemplation_month)
        .ok_or_else(|| CredisimError::InvalidInput {
            field: "policy.recommended_bid".into(),
            reason: format!("No band covers month {}", input.contemplation_month),
        })?;

    if bid_pct_of_credit < recommended_bid_pct {
        warnings.push(format!(
            "Bid of {}% is below the {}% typically needed for contemplation by month {}",
            bid_pct_of_credit.round_dp(2),
            recommended_bid_pct,
            input.contemplation_month
        ));
    }

    debug!(
        "consortium plan: credit={} term={} plan_total={} bid_pct={} tier={}",
        credit,
        input.term_months,
        plan_total,
        bid_pct_of_credit,
        contemplation.label
    );

    let output = ConsortiumResult {
        fee_rate,
        plan_total,
        base_installment,
        embedded_bid,
        total_bid,
        bid_pct_of_credit,
        net_credit_received,
        post_bid_balance,
        bid_reduction,
        paid_until_contemplation,
        contemplation_month: input.contemplation_month,
        total_cost,
        contemplation,
        competitiveness,
        recommended_bid_pct,
        policy_version: policy.version.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Consortium plan — fee-loaded plan total, bid economics, heuristic contemplation tiers",
        &serde_json::json!({
            "credit_value": credit.to_string(),
            "term_months": input.term_months,
            "admin_fee_pct": input.admin_fee_pct.to_string(),
            "reserve_fund_pct": input.reserve_fund_pct.to_string(),
            "bid_reduction": input.bid_reduction,
            "policy_version": policy.version,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_consortium_input(input: &ConsortiumInput) -> CredisimResult<()> {
    if input.credit_value <= Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "credit_value".into(),
            reason: "Credit value must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(CredisimError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if input.admin_fee_pct < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "admin_fee_pct".into(),
            reason: "Administrative fee cannot be negative".into(),
        });
    }
    if input.reserve_fund_pct < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "reserve_fund_pct".into(),
            reason: "Reserve fund cannot be negative".into(),
        });
    }
    if input.bid.embedded_pct < Decimal::ZERO || input.bid.embedded_pct > PERCENT {
        return Err(CredisimError::InvalidInput {
            field: "bid.embedded_pct".into(),
            reason: "Embedded bid must be between 0% and 100% of the credit".into(),
        });
    }
    if input.bid.free_bid < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "bid.free_bid".into(),
            reason: "Free bid cannot be negative".into(),
        });
    }
    if input.bid.fixed_bid < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "bid.fixed_bid".into(),
            reason: "Fixed bid cannot be negative".into(),
        });
    }
    if input.contemplation_month == 0 || input.contemplation_month > input.term_months {
        return Err(CredisimError::InvalidInput {
            field: "contemplation_month".into(),
            reason: format!(
                "Contemplation month must be between 1 and the term ({})",
                input.term_months
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Number of whole installments of `installment` that fit in `balance`.
fn whole_periods(balance: Money, installment: Money) -> CredisimResult<u32> {
    if installment.is_zero() {
        return Err(CredisimError::DivisionByZero {
            context: "remaining term at zero installment".into(),
        });
    }
    Ok((balance / installment).floor().to_u32().unwrap_or(u32::MAX))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consortium::policy::{Competitiveness, ContemplationTier};

    fn standard_plan() -> ConsortiumInput {
        ConsortiumInput {
            credit_value: dec!(300000),
            term_months: 180,
            admin_fee_pct: dec!(15),
            reserve_fund_pct: dec!(2),
            bid: BidInput {
                embedded_pct: dec!(30),
                free_bid: Decimal::ZERO,
                fixed_bid: Decimal::ZERO,
            },
            contemplation_month: 12,
            bid_reduction: BidReduction::ReduceInstallment,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Plan total, installment and embedded bid
    // -----------------------------------------------------------------------
    #[test]
    fn test_standard_plan_economics() {
        let out = compute_plan_default(&standard_plan()).unwrap().result;

        assert_eq!(out.fee_rate, dec!(0.17));
        assert_eq!(out.plan_total, dec!(351000));
        assert_eq!(out.base_installment, dec!(1950));
        assert_eq!(out.embedded_bid, dec!(90000));
        assert_eq!(out.net_credit_received, dec!(210000));
        assert_eq!(out.total_bid, dec!(90000));
        assert_eq!(out.bid_pct_of_credit, dec!(30));
    }

    // -----------------------------------------------------------------------
    // 2. Reduce installment keeps the term
    // -----------------------------------------------------------------------
    #[test]
    fn test_reduce_installment() {
        let out = compute_plan_default(&standard_plan()).unwrap().result;

        // (351000 - 90000) / 180 = 1450
        assert_eq!(out.post_bid_balance, dec!(261000));
        assert_eq!(out.bid_reduction.mode, BidReduction::ReduceInstallment);
        assert_eq!(out.bid_reduction.installment, dec!(1450));
        assert_eq!(out.bid_reduction.term_months, 180);
    }

    // -----------------------------------------------------------------------
    // 3. Reduce term keeps the installment
    // -----------------------------------------------------------------------
    #[test]
    fn test_reduce_term() {
        let mut input = standard_plan();
        input.bid_reduction = BidReduction::ReduceTerm;
        let out = compute_plan_default(&input).unwrap().result;

        // floor(261000 / 1950) = 133
        assert_eq!(out.bid_reduction.mode, BidReduction::ReduceTerm);
        assert_eq!(out.bid_reduction.installment, dec!(1950));
        assert_eq!(out.bid_reduction.term_months, 133);
    }

    // -----------------------------------------------------------------------
    // 4. Free and fixed bids add to the total, not to the embedded share
    // -----------------------------------------------------------------------
    #[test]
    fn test_free_and_fixed_bids() {
        let mut input = standard_plan();
        input.bid.free_bid = dec!(15000);
        input.bid.fixed_bid = dec!(15000);
        let out = compute_plan_default(&input).unwrap().result;

        assert_eq!(out.embedded_bid, dec!(90000));
        assert_eq!(out.net_credit_received, dec!(210000));
        assert_eq!(out.total_bid, dec!(120000));
        assert_eq!(out.bid_pct_of_credit, dec!(40));
        assert_eq!(out.contemplation.tier, ContemplationTier::VeryHigh);
        assert_eq!(out.total_cost, dec!(471000));
    }

    // -----------------------------------------------------------------------
    // 5. Heuristic tiers at 30%
    // -----------------------------------------------------------------------
    #[test]
    fn test_tiers_for_thirty_percent() {
        let out = compute_plan_default(&standard_plan()).unwrap().result;

        assert_eq!(out.contemplation.tier, ContemplationTier::High);
        assert_eq!(out.contemplation.estimate_pct, dec!(75));
        assert_eq!(out.competitiveness.tier, Competitiveness::HighlyCompetitive);
        assert_eq!(out.recommended_bid_pct, dec!(30));
        assert_eq!(out.policy_version, "standard-v1");
    }

    // -----------------------------------------------------------------------
    // 6. Zero bid lands in the bottom tiers
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_bid() {
        let mut input = standard_plan();
        input.bid.embedded_pct = Decimal::ZERO;
        let result = compute_plan_default(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.contemplation.label, "Very Low");
        assert_eq!(out.contemplation.estimate_pct, dec!(10));
        assert_eq!(out.competitiveness.label, "Low competitiveness");
        assert_eq!(out.net_credit_received, dec!(300000));
        assert!(result.warnings.iter().any(|w| w.contains("below")));
    }

    // -----------------------------------------------------------------------
    // 7. Paid until contemplation
    // -----------------------------------------------------------------------
    #[test]
    fn test_paid_until_contemplation() {
        let out = compute_plan_default(&standard_plan()).unwrap().result;
        assert_eq!(out.paid_until_contemplation, dec!(23400));
    }

    // -----------------------------------------------------------------------
    // 8. Bid larger than the plan floors the balance
    // -----------------------------------------------------------------------
    #[test]
    fn test_bid_exceeding_plan_total() {
        let mut input = standard_plan();
        input.bid.embedded_pct = dec!(100);
        input.bid.free_bid = dec!(100000);
        let result = compute_plan_default(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.post_bid_balance, Decimal::ZERO);
        assert_eq!(out.bid_reduction.installment, Decimal::ZERO);
        assert_eq!(out.net_credit_received, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("exceeds")));
    }

    // -----------------------------------------------------------------------
    // 9. Higher bid: less net credit, never a lower estimate
    // -----------------------------------------------------------------------
    #[test]
    fn test_bid_monotonicity() {
        let mut input = standard_plan();
        let mut prev_net = Decimal::MAX;
        let mut prev_estimate = Decimal::ZERO;

        for pct in (0..=100).step_by(5) {
            input.bid.embedded_pct = Decimal::from(pct);
            let out = compute_plan_default(&input).unwrap().result;

            assert!(out.net_credit_received < prev_net, "net credit did not fall at {pct}%");
            assert!(
                out.contemplation.estimate_pct >= prev_estimate,
                "estimate fell at {pct}%"
            );
            prev_net = out.net_credit_received;
            prev_estimate = out.contemplation.estimate_pct;
        }
    }

    // -----------------------------------------------------------------------
    // 10. Alternate policy is honoured
    // -----------------------------------------------------------------------
    #[test]
    fn test_custom_policy_version() {
        let mut policy = BidPolicy::standard();
        policy.version = "aggressive-groups".into();
        policy.probability[2].estimate_pct = dec!(40);

        let mut input = standard_plan();
        input.bid.embedded_pct = dec!(25);
        let out = compute_plan(&input, &policy).unwrap().result;

        assert_eq!(out.policy_version, "aggressive-groups");
        assert_eq!(out.contemplation.estimate_pct, dec!(40));
    }

    // -----------------------------------------------------------------------
    // 11. Validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_zero_credit() {
        let mut input = standard_plan();
        input.credit_value = Decimal::ZERO;

        let err = compute_plan_default(&input).unwrap_err();
        match err {
            CredisimError::InvalidInput { field, .. } => assert_eq!(field, "credit_value"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_negative_fee() {
        let mut input = standard_plan();
        input.admin_fee_pct = dec!(-1);

        let err = compute_plan_default(&input).unwrap_err();
        match err {
            CredisimError::InvalidInput { field, .. } => assert_eq!(field, "admin_fee_pct"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_contemplation_after_term() {
        let mut input = standard_plan();
        input.contemplation_month = 181;

        let err = compute_plan_default(&input).unwrap_err();
        match err {
            CredisimError::InvalidInput { field, .. } => {
                assert_eq!(field, "contemplation_month")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_embedded_over_hundred() {
        let mut input = standard_plan();
        input.bid.embedded_pct = dec!(100.5);
        assert!(compute_plan_default(&input).is_err());
    }

    #[test]
    fn test_whole_periods_floor() {
        assert_eq!(whole_periods(dec!(1000), dec!(300)).unwrap(), 3);
        assert_eq!(whole_periods(Decimal::ZERO, dec!(300)).unwrap(), 0);
        assert!(whole_periods(dec!(1000), Decimal::ZERO).is_err());
    }
}
