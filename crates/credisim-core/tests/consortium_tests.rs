use credisim_core::consortium::{
    compute_plan, compute_plan_default, BidInput, BidPolicy, BidReduction, Competitiveness,
    ConsortiumInput, ContemplationTier,
};
use credisim_core::CredisimError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn plan(embedded_pct: Decimal) -> ConsortiumInput {
    ConsortiumInput {
        credit_value: dec!(300000),
        term_months: 180,
        admin_fee_pct: dec!(15),
        reserve_fund_pct: dec!(2),
        bid: BidInput {
            embedded_pct,
            ..BidInput::default()
        },
        contemplation_month: 12,
        bid_reduction: BidReduction::ReduceInstallment,
    }
}

#[test]
fn test_scenario_300k_15_2_180_30pct() {
    let out = compute_plan_default(&plan(dec!(30))).unwrap().result;

    assert_eq!(out.plan_total, dec!(351000));
    assert_eq!(out.base_installment, dec!(1950.00));
    assert_eq!(out.embedded_bid, dec!(90000));
    assert_eq!(out.net_credit_received, dec!(210000));
}

#[test]
fn test_boundary_tiers() {
    let zero = compute_plan_default(&plan(dec!(0))).unwrap().result;
    assert_eq!(zero.contemplation.tier, ContemplationTier::VeryLow);
    assert_eq!(zero.contemplation.estimate_pct, dec!(10));
    assert_eq!(zero.competitiveness.tier, Competitiveness::Low);

    let just_below = compute_plan_default(&plan(dec!(39.999))).unwrap().result;
    assert_eq!(just_below.contemplation.label, "High");
    assert_eq!(just_below.contemplation.estimate_pct, dec!(75));

    let forty = compute_plan_default(&plan(dec!(40))).unwrap().result;
    assert_eq!(forty.contemplation.label, "Very High");
    assert_eq!(forty.contemplation.estimate_pct, dec!(90));
}

#[test]
fn test_reduction_modes_are_exclusive() {
    let installment = compute_plan_default(&plan(dec!(30))).unwrap().result;

    let mut by_term = plan(dec!(30));
    by_term.bid_reduction = BidReduction::ReduceTerm;
    let term = compute_plan_default(&by_term).unwrap().result;

    assert!(installment.bid_reduction.installment < installment.base_installment);
    assert_eq!(installment.bid_reduction.term_months, 180);

    assert_eq!(term.bid_reduction.installment, term.base_installment);
    assert!(term.bid_reduction.term_months < 180);
}

#[test]
fn test_policy_loaded_from_json() {
    let json = r#"{
        "version": "two-tier",
        "probability": [
            {"upper_pct": "25", "tier": "low", "estimate_pct": "20"},
            {"tier": "high", "estimate_pct": "80"}
        ],
        "competitiveness": [
            {"upper_pct": "25", "tier": "competitive"},
            {"tier": "aggressive"}
        ],
        "recommended_bid": [
            {"max_month": 12, "bid_pct": "35"},
            {"bid_pct": "15"}
        ]
    }"#;
    let policy: BidPolicy = serde_json::from_str(json).unwrap();
    let out = compute_plan(&plan(dec!(30)), &policy).unwrap().result;

    assert_eq!(out.policy_version, "two-tier");
    assert_eq!(out.contemplation.tier, ContemplationTier::High);
    assert_eq!(out.contemplation.estimate_pct, dec!(80));
    assert_eq!(out.competitiveness.label, "Aggressive bid");
    assert_eq!(out.recommended_bid_pct, dec!(35));
}

#[test]
fn test_invalid_policy_rejected_before_computation() {
    let mut policy = BidPolicy::standard();
    policy.probability.clear();

    match compute_plan(&plan(dec!(30)), &policy).unwrap_err() {
        CredisimError::InvalidInput { field, .. } => assert_eq!(field, "policy.probability"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_zero_term_rejected() {
    let mut input = plan(dec!(30));
    input.term_months = 0;

    match compute_plan_default(&input).unwrap_err() {
        CredisimError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}
