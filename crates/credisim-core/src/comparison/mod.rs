pub mod score;
pub mod simulation;
pub mod strategy;

pub use score::{score_single_product, SingleProductInput, StrategyScore, StrategyScorePolicy};
pub use simulation::{compare_simulation, run_simulation, Simulation, SimulationInput};
pub use strategy::{
    compare_strategies, ComparisonResult, Criterion, CriterionOutcome, ScoringWeights,
    TIE_BREAK_PRODUCT,
};
