use napi::Result as NapiResult;
use napi_derive::napi;

use credisim_core::consortium::BidPolicy;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn policy_or_default(policy_json: Option<String>) -> NapiResult<BidPolicy> {
    match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(BidPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let input: credisim_core::amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credisim_core::amortization::compute_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn financed_principal(input_json: String) -> NapiResult<String> {
    let input: credisim_core::amortization::FinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let principal =
        credisim_core::amortization::financed_principal(&input).map_err(to_napi_error)?;
    Ok(principal.to_string())
}

// ---------------------------------------------------------------------------
// Consortium
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_plan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: credisim_core::consortium::ConsortiumInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_or_default(policy_json)?;
    let output =
        credisim_core::consortium::compute_plan(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Takes a full simulation input and returns only the comparison envelope.
#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: credisim_core::comparison::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credisim_core::comparison::compare_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_simulation(input_json: String) -> NapiResult<String> {
    let input: credisim_core::comparison::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = credisim_core::comparison::run_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn score_single_product(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: credisim_core::comparison::SingleProductInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy: credisim_core::comparison::StrategyScorePolicy = match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => Default::default(),
    };
    let output = credisim_core::comparison::score_single_product(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
