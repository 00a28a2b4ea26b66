use super::deductions::DeductionCode;
use super::india::{AssessmentYear, Regime};
use rust_decimal::Decimal;

/// Input rejected before any computation takes place.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("gross income must not be negative: {0}")]
    NegativeIncome(Decimal),
    #[error("taxable income must not be negative: {0}")]
    NegativeTaxableIncome(Decimal),
    #[error("deduction {code} must not be negative: {amount}")]
    NegativeDeduction { code: DeductionCode, amount: Decimal },
    #[error("unknown regime: {0}")]
    UnknownRegime(String),
    #[error("unknown age bracket: {0}")]
    UnknownAgeBracket(String),
    #[error("unknown deduction code: {0}")]
    UnknownDeduction(String),
    #[error("invalid assessment year: {0}")]
    InvalidAssessmentYear(String),
    #[error("age bracket is required for the old regime")]
    MissingAgeBracket,
    #[error("no tax configuration for assessment year {0}")]
    UnsupportedYear(AssessmentYear),
}

/// Tax table that fails validation at load time.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{regime} regime: no brackets defined")]
    NoBrackets { regime: Regime },
    #[error("{regime} regime: bracket {index} is not above the previous upper bound")]
    UnorderedBrackets { regime: Regime, index: usize },
    #[error("{regime} regime: only the last bracket may be unbounded (bracket {index})")]
    UnboundedNotLast { regime: Regime, index: usize },
    #[error("{regime} regime: the last bracket must be unbounded")]
    MissingUnboundedBracket { regime: Regime },
    #[error("{regime} regime: bracket {index} has negative rate {rate}")]
    NegativeRate {
        regime: Regime,
        index: usize,
        rate: Decimal,
    },
    #[error("{regime} regime: bracket {index} rate {rate} is below the previous bracket")]
    DecreasingRate {
        regime: Regime,
        index: usize,
        rate: Decimal,
    },
    #[error("{regime} regime: surcharge slab {index} is out of order")]
    UnorderedSurchargeSlabs { regime: Regime, index: usize },
    #[error("{regime} regime: surcharge slab {index} has invalid rate {rate}")]
    InvalidSurchargeRate {
        regime: Regime,
        index: usize,
        rate: Decimal,
    },
    #[error("{regime} regime: surcharge policy must be {expected}")]
    WrongSurchargePolicy {
        regime: Regime,
        expected: &'static str,
    },
    #[error("{regime} regime: surcharge override threshold {threshold} must be above the top slab")]
    OverrideBelowTopSlab { regime: Regime, threshold: Decimal },
    #[error("{regime} regime: surcharge cap {rate} must be between 0 and 1")]
    InvalidSurchargeCap { regime: Regime, rate: Decimal },
    #[error("{regime} regime: rebate rule must be {expected}")]
    WrongRebateRule {
        regime: Regime,
        expected: &'static str,
    },
    #[error("{regime} regime: negative amount in {field}")]
    NegativeAmount { regime: Regime, field: String },
    #[error("assessment year {year}: cess rate {rate} must be between 0 and 1")]
    InvalidCessRate { year: AssessmentYear, rate: Decimal },
    #[error("assessment year {year}: regime table is labelled {found}")]
    MislabelledRegime {
        year: AssessmentYear,
        found: Regime,
    },
    #[error("assessment year {0} is defined more than once")]
    DuplicateYear(AssessmentYear),
    #[error("tax table defines no assessment years")]
    EmptyTable,
}
