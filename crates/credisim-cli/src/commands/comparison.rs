use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use credisim_core::comparison::{
    self, ScoringWeights, SimulationInput, SingleProductInput, StrategyScorePolicy,
};
use credisim_core::consortium::BidPolicy;
use credisim_core::Product;

use super::consortium::check_plan_ranges;
use super::loan::check_loan_ranges;
use crate::input;

/// Arguments for financing vs. consortium scoring
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON/YAML simulation input (loan + consortium)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML bid policy (overrides the one in the input)
    #[arg(long)]
    pub policy: Option<String>,

    /// Path to JSON/YAML scoring weights (overrides the ones in the input)
    #[arg(long)]
    pub weights: Option<String>,
}

/// Arguments for a full simulation run
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON/YAML simulation input (loan + consortium)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML bid policy (overrides the one in the input)
    #[arg(long)]
    pub policy: Option<String>,

    /// Path to JSON/YAML scoring weights (overrides the ones in the input)
    #[arg(long)]
    pub weights: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProductArg {
    Financing,
    Consortium,
}

impl From<ProductArg> for Product {
    fn from(p: ProductArg) -> Self {
        match p {
            ProductArg::Financing => Product::Financing,
            ProductArg::Consortium => Product::Consortium,
        }
    }
}

/// Arguments for the single-product score
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML score policy
    #[arg(long)]
    pub score_policy: Option<String>,

    /// Product being scored
    #[arg(long, value_enum, default_value = "financing")]
    pub product: ProductArg,

    /// Total cost of the product (R$)
    #[arg(long)]
    pub total_cost: Option<Decimal>,

    /// Monthly installment (R$)
    #[arg(long)]
    pub installment: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim = load_simulation(
        args.input.as_deref(),
        args.policy.as_deref(),
        args.weights.as_deref(),
    )?;
    let result = comparison::compare_simulation(&sim)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim = load_simulation(
        args.input.as_deref(),
        args.policy.as_deref(),
        args.weights.as_deref(),
    )?;
    let result = comparison::run_simulation(&sim)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let score_input: SingleProductInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        SingleProductInput {
            product: args.product.into(),
            total_cost: args
                .total_cost
                .ok_or("--total-cost is required (or provide --input)")?,
            installment: args
                .installment
                .ok_or("--installment is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
        }
    };
    let policy: StrategyScorePolicy =
        input::file::read_config_or_default(args.score_policy.as_deref())?;

    let result = comparison::score_single_product(&score_input, &policy)?;
    Ok(serde_json::to_value(result)?)
}

/// Simulation input from file or stdin, with policy and weights files
/// layered on top.
fn load_simulation(
    path: Option<&str>,
    policy_path: Option<&str>,
    weights_path: Option<&str>,
) -> Result<SimulationInput, Box<dyn std::error::Error>> {
    let mut sim: SimulationInput = if let Some(path) = path {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input is required (or pipe a simulation on stdin)".into());
    };

    if let Some(path) = policy_path {
        sim.policy = Some(input::file::read_input::<BidPolicy>(path)?);
    }
    if let Some(path) = weights_path {
        sim.weights = Some(input::file::read_input::<ScoringWeights>(path)?);
    }

    check_loan_ranges(&sim.loan);
    check_plan_ranges(&sim.consortium);
    Ok(sim)
}
