//! Heuristic bid tables for consortium plans.
//!
//! These are static sales heuristics keyed on the bid as a percentage of the
//! credit value, not a statistical model of any real group. Tables are
//! versioned so an alternate policy can be loaded from configuration and
//! selected explicitly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CredisimError;
use crate::types::Percent;
use crate::CredisimResult;

pub const STANDARD_POLICY_VERSION: &str = "standard-v1";

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContemplationTier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ContemplationTier {
    pub fn label(&self) -> &'static str {
        match self {
            ContemplationTier::VeryLow => "Very Low",
            ContemplationTier::Low => "Low",
            ContemplationTier::Medium => "Medium",
            ContemplationTier::High => "High",
            ContemplationTier::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitiveness {
    Low,
    Competitive,
    HighlyCompetitive,
    Aggressive,
}

impl Competitiveness {
    pub fn label(&self) -> &'static str {
        match self {
            Competitiveness::Low => "Low competitiveness",
            Competitiveness::Competitive => "Competitive",
            Competitiveness::HighlyCompetitive => "Highly competitive",
            Competitiveness::Aggressive => "Aggressive bid",
        }
    }
}

/// Contemplation likelihood for a given bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContemplationEstimate {
    pub tier: ContemplationTier,
    pub label: String,
    /// Illustrative likelihood on a 0–100 scale.
    pub estimate_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitivenessRanking {
    pub tier: Competitiveness,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// Half-open band `[previous upper, upper_pct)`. `None` closes the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityBand {
    #[serde(default)]
    pub upper_pct: Option<Percent>,
    pub tier: ContemplationTier,
    pub estimate_pct: Percent,
}

/// Half-open band `[previous upper, upper_pct)`. `None` closes the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitivenessBand {
    #[serde(default)]
    pub upper_pct: Option<Percent>,
    pub tier: Competitiveness,
}

/// Inclusive band on the target contemplation month. `None` closes the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedBidBand {
    #[serde(default)]
    pub max_month: Option<u32>,
    pub bid_pct: Percent,
}

/// A complete, named set of bid heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidPolicy {
    pub version: String,
    pub probability: Vec<ProbabilityBand>,
    pub competitiveness: Vec<CompetitivenessBand>,
    pub recommended_bid: Vec<RecommendedBidBand>,
}

impl Default for BidPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl BidPolicy {
    /// Probability on 10-point bands, competitiveness on 15-point bands,
    /// recommended bid by contemplation horizon.
    pub fn standard() -> Self {
        use Competitiveness as C;
        use ContemplationTier as T;

        let prob = |upper: Option<Decimal>, tier, estimate| ProbabilityBand {
            upper_pct: upper,
            tier,
            estimate_pct: estimate,
        };
        let comp = |upper: Option<Decimal>, tier| CompetitivenessBand { upper_pct: upper, tier };
        let rec = |max_month: Option<u32>, bid_pct| RecommendedBidBand { max_month, bid_pct };

        BidPolicy {
            version: STANDARD_POLICY_VERSION.into(),
            probability: vec![
                prob(Some(dec!(10)), T::VeryLow, dec!(10)),
                prob(Some(dec!(20)), T::Low, dec!(25)),
                prob(Some(dec!(30)), T::Medium, dec!(50)),
                prob(Some(dec!(40)), T::High, dec!(75)),
                prob(None, T::VeryHigh, dec!(90)),
            ],
            competitiveness: vec![
                comp(Some(dec!(15)), C::Low),
                comp(Some(dec!(30)), C::Competitive),
                comp(Some(dec!(45)), C::HighlyCompetitive),
                comp(None, C::Aggressive),
            ],
            recommended_bid: vec![
                rec(Some(6), dec!(40)),
                rec(Some(12), dec!(30)),
                rec(Some(24), dec!(20)),
                rec(None, dec!(10)),
            ],
        }
    }

    /// Check every table is non-empty, strictly ascending and closed by an
    /// open-ended final band.
    pub fn validate(&self) -> CredisimResult<()> {
        check_bands(
            "probability",
            &self.probability.iter().map(|b| b.upper_pct).collect::<Vec<_>>(),
        )?;
        check_bands(
            "competitiveness",
            &self.competitiveness.iter().map(|b| b.upper_pct).collect::<Vec<_>>(),
        )?;
        check_bands(
            "recommended_bid",
            &self
                .recommended_bid
                .iter()
                .map(|b| b.max_month.map(Decimal::from))
                .collect::<Vec<_>>(),
        )?;

        if self
            .probability
            .iter()
            .any(|b| b.estimate_pct < Decimal::ZERO || b.estimate_pct > dec!(100))
        {
            return Err(CredisimError::InvalidInput {
                field: "policy.probability".into(),
                reason: "Estimates must lie between 0 and 100".into(),
            });
        }
        if self
            .recommended_bid
            .iter()
            .any(|b| b.bid_pct < Decimal::ZERO || b.bid_pct > dec!(100))
        {
            return Err(CredisimError::InvalidInput {
                field: "policy.recommended_bid".into(),
                reason: "Recommended bids must lie between 0 and 100".into(),
            });
        }
        Ok(())
    }

    pub fn contemplation(&self, bid_pct: Percent) -> Option<ContemplationEstimate> {
        self.probability
            .iter()
            .find(|b| b.upper_pct.map_or(true, |upper| bid_pct < upper))
            .map(|b| ContemplationEstimate {
                tier: b.tier,
                label: b.tier.label().to_string(),
                estimate_pct: b.estimate_pct,
            })
    }

    pub fn competitiveness(&self, bid_pct: Percent) -> Option<CompetitivenessRanking> {
        self.competitiveness
            .iter()
            .find(|b| b.upper_pct.map_or(true, |upper| bid_pct < upper))
            .map(|b| CompetitivenessRanking {
                tier: b.tier,
                label: b.tier.label().to_string(),
            })
    }

    /// Advisory bid for reaching contemplation by `month`.
    pub fn recommended_bid_pct(&self, month: u32) -> Option<Percent> {
        self.recommended_bid
            .iter()
            .find(|b| b.max_month.map_or(true, |max| month <= max))
            .map(|b| b.bid_pct)
    }
}

fn check_bands(table: &str, uppers: &[Option<Decimal>]) -> CredisimResult<()> {
    let field = format!("policy.{table}");
    let Some((last, bounded)) = uppers.split_last() else {
        return Err(CredisimError::InvalidInput {
            field,
            reason: "Table must contain at least one band".into(),
        });
    };
    if last.is_some() {
        return Err(CredisimError::InvalidInput {
            field,
            reason: "Final band must be open-ended".into(),
        });
    }

    let mut previous: Option<Decimal> = None;
    for upper in bounded {
        let Some(upper) = upper else {
            return Err(CredisimError::InvalidInput {
                field,
                reason: "Only the final band may be open-ended".into(),
            });
        };
        if previous.is_some_and(|p| *upper <= p) {
            return Err(CredisimError::InvalidInput {
                field,
                reason: "Band bounds must be strictly ascending".into(),
            });
        }
        previous = Some(*upper);
    }
    Ok(())
}
