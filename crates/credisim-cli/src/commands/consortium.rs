use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use credisim_core::consortium::{self, BidInput, BidPolicy, BidReduction, ConsortiumInput};

use super::check_documented_range;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReductionArg {
    /// Keep the term, lower the installment
    Installment,
    /// Keep the installment, shorten the term
    Term,
}

impl From<ReductionArg> for BidReduction {
    fn from(r: ReductionArg) -> Self {
        match r {
            ReductionArg::Installment => BidReduction::ReduceInstallment,
            ReductionArg::Term => BidReduction::ReduceTerm,
        }
    }
}

/// Arguments for consortium plan economics
#[derive(Args)]
pub struct ConsortiumArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML bid policy (defaults to standard-v1)
    #[arg(long)]
    pub policy: Option<String>,

    /// Credit letter value (R$), documented range 50,000–3,000,000
    #[arg(long)]
    pub credit: Option<Decimal>,

    /// Plan term in months, documented range 60–240
    #[arg(long)]
    pub term: Option<u32>,

    /// Administrative fee (%), documented range 5–30
    #[arg(long)]
    pub admin_fee: Option<Decimal>,

    /// Reserve fund (%), documented range 0–5
    #[arg(long, default_value = "0")]
    pub reserve_fund: Decimal,

    /// Embedded bid as % of the credit, 0–100
    #[arg(long, default_value = "0")]
    pub bid_pct: Decimal,

    /// Free (cash) bid (R$)
    #[arg(long, default_value = "0")]
    pub free_bid: Decimal,

    /// Fixed bid (R$)
    #[arg(long, default_value = "0")]
    pub fixed_bid: Decimal,

    /// Target contemplation month (1..=term)
    #[arg(long, default_value = "12")]
    pub contemplation: u32,

    /// What the bid pays down
    #[arg(long, value_enum, default_value = "installment")]
    pub reduce: ReductionArg,
}

pub fn run_consortium(args: ConsortiumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: ConsortiumInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ConsortiumInput {
            credit_value: args
                .credit
                .ok_or("--credit is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            admin_fee_pct: args
                .admin_fee
                .ok_or("--admin-fee is required (or provide --input)")?,
            reserve_fund_pct: args.reserve_fund,
            bid: BidInput {
                embedded_pct: args.bid_pct,
                free_bid: args.free_bid,
                fixed_bid: args.fixed_bid,
            },
            contemplation_month: args.contemplation,
            bid_reduction: args.reduce.into(),
        }
    };
    let policy: BidPolicy = input::file::read_config_or_default(args.policy.as_deref())?;

    check_plan_ranges(&plan_input);

    let result = consortium::compute_plan(&plan_input, &policy)?;
    Ok(serde_json::to_value(result)?)
}

pub(crate) fn check_plan_ranges(plan: &ConsortiumInput) {
    check_documented_range("credit_value", plan.credit_value, dec!(50000), dec!(3000000));
    check_documented_range(
        "consortium_term_months",
        Decimal::from(plan.term_months),
        dec!(60),
        dec!(240),
    );
    check_documented_range("admin_fee_pct", plan.admin_fee_pct, dec!(5), dec!(30));
    check_documented_range("reserve_fund_pct", plan.reserve_fund_pct, dec!(0), dec!(5));
    check_documented_range("bid.embedded_pct", plan.bid.embedded_pct, dec!(0), dec!(100));
}
