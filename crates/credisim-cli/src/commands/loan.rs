use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use credisim_core::amortization::{
    self, AmortizationMethod, ExtraAmortizationReporting, FinancingInput, LoanInput,
};

use super::check_documented_range;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Price,
    Sac,
}

impl From<MethodArg> for AmortizationMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Price => AmortizationMethod::Price,
            MethodArg::Sac => AmortizationMethod::Sac,
        }
    }
}

/// Arguments for a loan schedule
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Financed amount (R$). Alternatively give --asset-value and --down-payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Asset price (R$), documented range 100,000–5,000,000
    #[arg(long)]
    pub asset_value: Option<Decimal>,

    /// Down payment (R$)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Largest financed share of the asset value
    #[arg(long, default_value = "0.80")]
    pub max_financing_ratio: Decimal,

    /// Monthly interest rate in percent (1.2 = 1.2% a month), documented range 0.5–3.0
    #[arg(long)]
    pub rate_pct: Option<Decimal>,

    /// Term in months, documented range 12–420
    #[arg(long)]
    pub term: Option<u32>,

    /// Amortization system
    #[arg(long, value_enum, default_value = "price")]
    pub method: MethodArg,

    /// Fixed extra amortization paid every month (R$)
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Report the extra amortization in its own column instead of inside the installment
    #[arg(long)]
    pub extra_separate: bool,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        loan_from_flags(&args)?
    };

    check_loan_ranges(&loan_input);

    let result = amortization::compute_schedule(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub(crate) fn check_loan_ranges(loan: &LoanInput) {
    check_documented_range(
        "monthly_rate_pct",
        loan.monthly_rate * dec!(100),
        dec!(0.5),
        dec!(3.0),
    );
    check_documented_range(
        "term_months",
        Decimal::from(loan.term_months),
        dec!(12),
        dec!(420),
    );
}

fn loan_from_flags(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let principal = match (args.principal, args.asset_value) {
        (Some(p), _) => p,
        (None, Some(asset_value)) => {
            check_documented_range("asset_value", asset_value, dec!(100000), dec!(5000000));
            amortization::financed_principal(&FinancingInput {
                asset_value,
                down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
                max_financing_ratio: args.max_financing_ratio,
            })?
        }
        (None, None) => {
            return Err("--principal or --asset-value is required (or provide --input)".into())
        }
    };

    let rate_pct = args
        .rate_pct
        .ok_or("--rate-pct is required (or provide --input)")?;

    Ok(LoanInput {
        principal,
        monthly_rate: rate_pct / dec!(100),
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        method: args.method.into(),
        extra_amortization: args.extra,
        extra_reporting: if args.extra_separate {
            ExtraAmortizationReporting::ReportedSeparately
        } else {
            ExtraAmortizationReporting::IncludedInInstallment
        },
    })
}
