pub mod cess;
pub mod config;
pub mod deductions;
pub mod engine;
pub mod error;
pub mod india;
pub mod rebate;
pub mod regime;
pub mod slab;
pub mod surcharge;

pub use config::{TaxTable, YearConfig, BUILTIN};
pub use deductions::{DeductionCode, DeductionSet};
pub use engine::{compare_regimes, compute_tax, ComputationResult, RegimeComparison, TaxInput};
pub use error::{ConfigError, ValidationError};
pub use india::{AgeBracket, AssessmentYear, Regime};
