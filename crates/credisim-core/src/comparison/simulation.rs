//! One-pass simulation: financing schedule, consortium plan and the
//! recommendation between them, as consumed by proposal renderers.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::strategy::{compare_strategies, ComparisonResult, ScoringWeights};
use crate::amortization::{
    compute_schedule, financed_principal, FinancingInput, LoanInput, LoanSchedule,
};
use crate::consortium::{compute_plan, BidPolicy, ConsortiumInput, ConsortiumResult};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CredisimResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub loan: LoanInput,
    /// When present, the loan principal is derived from asset value and down payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingInput>,
    pub consortium: ConsortiumInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<BidPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub principal: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    pub schedule: LoanSchedule,
    pub consortium: ConsortiumResult,
    pub comparison: ComparisonResult,
}

pub fn run_simulation(input: &SimulationInput) -> CredisimResult<ComputationOutput<Simulation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut loan = input.loan.clone();
    if let Some(financing) = &input.financing {
        let principal = financed_principal(financing)?;
        if principal != loan.principal {
            warnings.push(format!(
                "Loan principal {} replaced by financed amount {}",
                loan.principal, principal
            ));
        }
        loan.principal = principal;
    }

    let policy = input.policy.clone().unwrap_or_default();
    let weights = input.weights.clone().unwrap_or_default();

    let schedule = compute_schedule(&loan)?;
    let plan = compute_plan(&input.consortium, &policy)?;
    let comparison = compare_strategies(
        &schedule.result,
        &plan.result,
        loan.term_months,
        plan.result.bid_reduction.term_months,
        &weights,
    )?;

    warnings.extend(schedule.warnings);
    warnings.extend(plan.warnings);
    warnings.extend(comparison.warnings);

    let output = Simulation {
        principal: loan.principal,
        down_payment: input.financing.as_ref().map(|f| f.down_payment),
        schedule: schedule.result,
        consortium: plan.result,
        comparison: comparison.result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Financing vs. consortium simulation",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "method": loan.method,
            "loan_term": loan.term_months,
            "credit_value": input.consortium.credit_value.to_string(),
            "consortium_term": input.consortium.term_months,
            "policy_version": policy.version,
            "weights_version": weights.version,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Run the full simulation and keep only the comparison, so the financed
/// principal is resolved the same way as in [`run_simulation`].
pub fn compare_simulation(
    input: &SimulationInput,
) -> CredisimResult<ComputationOutput<ComparisonResult>> {
    let output = run_simulation(input)?;
    Ok(ComputationOutput {
        result: output.result.comparison,
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    })
}
