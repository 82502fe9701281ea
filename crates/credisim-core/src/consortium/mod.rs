pub mod plan;
pub mod policy;

pub use plan::{
    compute_plan, compute_plan_default, BidInput, BidReduction, BidReductionOutcome,
    ConsortiumInput, ConsortiumResult,
};
pub use policy::{
    BidPolicy, Competitiveness, CompetitivenessRanking, ContemplationEstimate, ContemplationTier,
};
