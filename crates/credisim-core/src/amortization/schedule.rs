//! Month-by-month amortization schedules for a financed loan.
//!
//! Supports the Price (French, level installment) and SAC (constant
//! amortization, declining installment) systems, with an optional fixed extra
//! amortization paid every period. All math uses `rust_decimal::Decimal`.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CredisimError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CredisimResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Amortization system used to build the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationMethod {
    /// Level installment (French system / Tabela Price).
    #[serde(alias = "Price", alias = "PRICE")]
    Price,
    /// Constant amortization, declining installment (Sistema de Amortização Constante).
    #[serde(alias = "SAC", alias = "Sac")]
    Sac,
}

/// How a per-period extra amortization shows up in each record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraAmortizationReporting {
    /// The extra is folded into both `amortization` and `installment`.
    #[default]
    IncludedInInstallment,
    /// `installment` and `amortization` show the contractual amounts only; the
    /// extra is reported in `extra_amortization` alone.
    ReportedSeparately,
}

/// Input for a loan schedule simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Financed amount.
    pub principal: Money,
    /// Periodic (monthly) interest rate as a decimal.
    pub monthly_rate: Rate,
    /// Number of monthly periods.
    pub term_months: u32,
    pub method: AmortizationMethod,
    /// Fixed extra principal paid every period.
    #[serde(default)]
    pub extra_amortization: Money,
    #[serde(default)]
    pub extra_reporting: ExtraAmortizationReporting,
}

/// A single period of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRecord {
    pub period: u32,
    /// Gross installment under the configured reporting convention.
    pub installment: Money,
    pub interest: Money,
    pub amortization: Money,
    /// Extra principal actually paid this period (capped at the balance).
    pub extra_amortization: Money,
    /// What the borrower pays this period: interest plus all principal.
    pub total_outflow: Money,
    /// Remaining balance after the period. Never negative.
    pub balance: Money,
}

/// Full schedule plus aggregates over the realized records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub method: AmortizationMethod,
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub records: Vec<InstallmentRecord>,
    pub first_installment: Money,
    /// Installment of the last period with a payment. Equals the final
    /// record's installment unless extras paid the loan off early.
    pub last_installment: Money,
    /// Sum of `total_outflow` across all records.
    pub total_paid: Money,
    /// `total_paid - principal`.
    pub total_interest: Money,
    /// First period whose closing balance is zero.
    pub payoff_period: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the month-by-month schedule for a Price or SAC loan.
pub fn compute_schedule(input: &LoanInput) -> CredisimResult<ComputationOutput<LoanSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_input(input)?;

    let schedule = build_schedule(input)?;

    if schedule.payoff_period < input.term_months {
        warnings.push(format!(
            "Extra amortization pays the loan off in period {} of {}; later periods carry no payment",
            schedule.payoff_period, input.term_months
        ));
    }

    debug!(
        "{:?} schedule: principal={} rate={} term={} total_paid={}",
        input.method, input.principal, input.monthly_rate, input.term_months, schedule.total_paid
    );

    let methodology = match input.method {
        AmortizationMethod::Price => "Price (French) amortization — level installment",
        AmortizationMethod::Sac => "SAC amortization — constant principal, declining installment",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "monthly_rate": input.monthly_rate.to_string(),
            "term_months": input.term_months,
            "extra_amortization": input.extra_amortization.to_string(),
            "extra_reporting": input.extra_reporting,
        }),
        warnings,
        elapsed,
        schedule,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan_input(input: &LoanInput) -> CredisimResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(CredisimError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 period".into(),
        });
    }
    if input.monthly_rate < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.extra_amortization < Decimal::ZERO {
        return Err(CredisimError::InvalidInput {
            field: "extra_amortization".into(),
            reason: "Extra amortization cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_schedule(input: &LoanInput) -> CredisimResult<LoanSchedule> {
    let rate = input.monthly_rate;
    let term = input.term_months;

    // Contractual principal due each period before extras.
    let level_installment = match input.method {
        AmortizationMethod::Price => Some(time_value::pmt(rate, term, input.principal)?),
        AmortizationMethod::Sac => None,
    };
    let sac_amortization = input.principal / Decimal::from(term);

    let mut records: Vec<InstallmentRecord> = Vec::with_capacity(term as usize);
    let mut balance = input.principal;
    let mut payoff_period = term;

    for period in 1..=term {
        if balance.is_zero() {
            records.push(InstallmentRecord {
                period,
                installment: Decimal::ZERO,
                interest: Decimal::ZERO,
                amortization: Decimal::ZERO,
                extra_amortization: Decimal::ZERO,
                total_outflow: Decimal::ZERO,
                balance: Decimal::ZERO,
            });
            continue;
        }

        let interest = balance * rate;
        let scheduled = match level_installment {
            Some(pmt) => (pmt - interest).max(Decimal::ZERO),
            None => sac_amortization,
        };

        let mut scheduled_paid = scheduled.min(balance);
        let extra_paid = input.extra_amortization.min(balance - scheduled_paid);
        if period == term {
            // Final period settles any residual drift.
            scheduled_paid = balance - extra_paid;
        }

        balance -= scheduled_paid + extra_paid;
        if balance <= Decimal::ZERO {
            balance = Decimal::ZERO;
            payoff_period = payoff_period.min(period);
        }

        let amortization = match input.extra_reporting {
            ExtraAmortizationReporting::IncludedInInstallment => scheduled_paid + extra_paid,
            ExtraAmortizationReporting::ReportedSeparately => scheduled_paid,
        };
        let installment = interest + amortization;
        let total_outflow = match input.extra_reporting {
            ExtraAmortizationReporting::IncludedInInstallment => installment,
            ExtraAmortizationReporting::ReportedSeparately => installment + extra_paid,
        };

        records.push(InstallmentRecord {
            period,
            installment,
            interest,
            amortization,
            extra_amortization: extra_paid,
            total_outflow,
            balance,
        });
    }

    let first_installment = records.first().map(|r| r.installment).unwrap_or_default();
    let last_installment = records
        .iter()
        .rev()
        .find(|r| r.total_outflow > Decimal::ZERO)
        .map(|r| r.installment)
        .unwrap_or_default();
    let total_paid: Money = records.iter().map(|r| r.total_outflow).sum();
    let total_interest = total_paid - input.principal;

    Ok(LoanSchedule {
        method: input.method,
        principal: input.principal,
        monthly_rate: rate,
        term_months: term,
        records,
        first_installment,
        last_installment,
        total_paid,
        total_interest,
        payoff_period,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
