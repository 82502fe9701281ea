pub mod financing;
pub mod schedule;

pub use financing::{financed_principal, FinancingInput};
pub use schedule::{
    compute_schedule, AmortizationMethod, ExtraAmortizationReporting, InstallmentRecord,
    LoanInput, LoanSchedule,
};
