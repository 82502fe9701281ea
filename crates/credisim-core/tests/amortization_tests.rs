use credisim_core::amortization::{
    compute_schedule, financed_principal, AmortizationMethod, ExtraAmortizationReporting,
    FinancingInput, LoanInput,
};
use credisim_core::CredisimError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TOLERANCE: Decimal = dec!(0.000001);

fn loan(method: AmortizationMethod, term_months: u32) -> LoanInput {
    LoanInput {
        principal: dec!(300000),
        monthly_rate: dec!(0.012),
        term_months,
        method,
        extra_amortization: Decimal::ZERO,
        extra_reporting: ExtraAmortizationReporting::IncludedInInstallment,
    }
}

// ===========================================================================
// Price
// ===========================================================================

#[test]
fn test_price_scenario_300k_240_months() {
    let result = compute_schedule(&loan(AmortizationMethod::Price, 240)).unwrap();
    let s = &result.result;

    // 300000 * 0.012 * 1.012^240 / (1.012^240 - 1) ≈ 3818.03
    assert!((s.first_installment - dec!(3818.03)).abs() < dec!(0.01));
    assert!((s.total_paid - s.first_installment * dec!(240)).abs() < dec!(0.0001));
    assert_eq!(s.total_paid - s.principal, s.total_interest);
    assert_eq!(s.records.len(), 240);
}

#[test]
fn test_price_interest_declines_amortization_grows() {
    let s = compute_schedule(&loan(AmortizationMethod::Price, 120))
        .unwrap()
        .result;

    for pair in s.records.windows(2) {
        assert!(pair[1].interest < pair[0].interest);
        assert!(pair[1].amortization > pair[0].amortization);
    }
}

// ===========================================================================
// SAC
// ===========================================================================

#[test]
fn test_sac_scenario_300k_180_months() {
    let s = compute_schedule(&loan(AmortizationMethod::Sac, 180))
        .unwrap()
        .result;

    assert!((s.first_installment - dec!(5266.67)).abs() < dec!(0.01));
    assert!((s.records[0].amortization - dec!(1666.67)).abs() < dec!(0.01));
    // Last installment: base amortization plus a small residual interest
    let base = dec!(300000) / dec!(180);
    assert!(s.last_installment > base);
    assert!(s.last_installment - base < dec!(25));
    assert_eq!(s.records.last().unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_sac_installments_decline_by_constant_step() {
    let s = compute_schedule(&loan(AmortizationMethod::Sac, 180))
        .unwrap()
        .result;

    // Each period interest falls by base * rate = 1666.67 * 0.012 = 20
    let step = dec!(300000) / dec!(180) * dec!(0.012);
    for pair in s.records.windows(2) {
        assert!(((pair[0].installment - pair[1].installment) - step).abs() < TOLERANCE);
    }
}

#[test]
fn test_sac_cheaper_than_price_over_same_term() {
    let price = compute_schedule(&loan(AmortizationMethod::Price, 180))
        .unwrap()
        .result;
    let sac = compute_schedule(&loan(AmortizationMethod::Sac, 180))
        .unwrap()
        .result;

    assert!(sac.total_interest < price.total_interest);
    assert!(sac.first_installment > price.first_installment);
}

// ===========================================================================
// Extras and financing
// ===========================================================================

#[test]
fn test_total_paid_counts_extras_once_in_both_conventions() {
    let mut included = loan(AmortizationMethod::Sac, 180);
    included.extra_amortization = dec!(300);
    let mut separate = included.clone();
    separate.extra_reporting = ExtraAmortizationReporting::ReportedSeparately;

    let a = compute_schedule(&included).unwrap().result;
    let b = compute_schedule(&separate).unwrap().result;

    assert!((a.total_paid - b.total_paid).abs() < TOLERANCE);
    assert_eq!(a.payoff_period, b.payoff_period);
    assert!(b.first_installment < a.first_installment);
}

#[test]
fn test_financed_principal_feeds_schedule() {
    let principal = financed_principal(&FinancingInput {
        asset_value: dec!(500000),
        down_payment: dec!(100000),
        max_financing_ratio: dec!(0.80),
    })
    .unwrap();

    let mut input = loan(AmortizationMethod::Price, 240);
    input.principal = principal;
    let s = compute_schedule(&input).unwrap().result;

    assert_eq!(s.principal, dec!(400000));
    assert!((s.first_installment - dec!(3818.03) * dec!(4) / dec!(3)).abs() < dec!(0.01));
}

#[test]
fn test_schedule_deserializes_from_json() {
    let input: LoanInput = serde_json::from_str(
        r#"{"principal": "250000", "monthly_rate": "0.01", "term_months": 120, "method": "SAC"}"#,
    )
    .unwrap();

    assert_eq!(input.method, AmortizationMethod::Sac);
    assert_eq!(input.extra_amortization, Decimal::ZERO);
    assert_eq!(
        input.extra_reporting,
        ExtraAmortizationReporting::IncludedInInstallment
    );
    assert!(compute_schedule(&input).is_ok());
}

#[test]
fn test_negative_principal_rejected() {
    let mut input = loan(AmortizationMethod::Sac, 180);
    input.principal = dec!(-1);

    match compute_schedule(&input).unwrap_err() {
        CredisimError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_price_factor_out_of_range_is_an_error() {
    let mut input = loan(AmortizationMethod::Price, 420);
    input.monthly_rate = dec!(0.3);

    match compute_schedule(&input).unwrap_err() {
        CredisimError::InvalidInput { field, .. } => assert_eq!(field, "monthly_rate"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }

    input.monthly_rate = dec!(0.1);
    let s = compute_schedule(&input).unwrap().result;
    assert!((s.first_installment - dec!(30000)).abs() < dec!(0.01));
}

#[test]
fn test_method_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&AmortizationMethod::Price).unwrap(),
        r#""price""#
    );
    assert_eq!(serde_json::to_string(&AmortizationMethod::Sac).unwrap(), r#""sac""#);

    for alias in [r#""Price""#, r#""PRICE""#, r#""price""#] {
        let m: AmortizationMethod = serde_json::from_str(alias).unwrap();
        assert_eq!(m, AmortizationMethod::Price);
    }
    for alias in [r#""SAC""#, r#""Sac""#, r#""sac""#] {
        let m: AmortizationMethod = serde_json::from_str(alias).unwrap();
        assert_eq!(m, AmortizationMethod::Sac);
    }
}
