pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "consortium")]
pub mod consortium;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::CredisimError;
pub use types::*;

/// Standard result type for all credisim operations
pub type CredisimResult<T> = Result<T, CredisimError>;
