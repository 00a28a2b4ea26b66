use super::error::ValidationError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Deduction heads that can be claimed against gross income
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum DeductionCode {
    /// Standard deduction for salaried taxpayers. Any positive claim grants
    /// the configured amount
    #[serde(rename = "standard")]
    Standard,
    /// Section 80C investments (PPF, ELSS, life insurance premium)
    #[serde(rename = "80C")]
    Section80C,
    /// Section 80TTA savings account interest (below 60 only)
    #[serde(rename = "80TTA")]
    Section80Tta,
    /// Section 80TTB deposit interest (senior citizens only)
    #[serde(rename = "80TTB")]
    Section80Ttb,
    /// Section 80CCD(1B) additional NPS contribution
    #[serde(rename = "80CCD1B")]
    Nps,
    /// Section 24(b) interest on a self-occupied home loan
    #[serde(rename = "24B")]
    HomeLoanInterest,
}

impl DeductionCode {
    pub const ALL: [DeductionCode; 6] = [
        DeductionCode::Standard,
        DeductionCode::Section80C,
        DeductionCode::Section80Tta,
        DeductionCode::Section80Ttb,
        DeductionCode::Nps,
        DeductionCode::HomeLoanInterest,
    ];

    pub fn display(&self) -> &'static str {
        match self {
            DeductionCode::Standard => "standard",
            DeductionCode::Section80C => "80C",
            DeductionCode::Section80Tta => "80TTA",
            DeductionCode::Section80Ttb => "80TTB",
            DeductionCode::Nps => "80CCD1B",
            DeductionCode::HomeLoanInterest => "24B",
        }
    }
}

impl FromStr for DeductionCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['(', ')'], "");
        DeductionCode::ALL
            .into_iter()
            .find(|code| code.display().eq_ignore_ascii_case(&normalized))
            .or(match normalized.as_str() {
                "NPS" => Some(DeductionCode::Nps),
                "STD" => Some(DeductionCode::Standard),
                _ => None,
            })
            .ok_or_else(|| ValidationError::UnknownDeduction(s.to_string()))
    }
}

impl std::fmt::Display for DeductionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Claimed deduction amounts keyed by deduction code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DeductionSet(
    #[schemars(with = "BTreeMap<DeductionCode, f64>")] BTreeMap<DeductionCode, Decimal>,
);

impl DeductionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, replacing any earlier claim under the same code
    pub fn claim(mut self, code: DeductionCode, amount: Decimal) -> Self {
        self.0.insert(code, amount);
        self
    }

    /// Claim the standard deduction at whatever amount the regime allows
    pub fn with_standard_deduction(self) -> Self {
        self.claim(DeductionCode::Standard, Decimal::ONE)
    }

    pub fn get(&self, code: DeductionCode) -> Option<Decimal> {
        self.0.get(&code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeductionCode, Decimal)> + '_ {
        self.0.iter().map(|(code, amount)| (*code, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.iter().find(|(_, amount)| *amount < Decimal::ZERO) {
            Some((code, amount)) => Err(ValidationError::NegativeDeduction { code, amount }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(DeductionCode, Decimal)> for DeductionSet {
    fn from_iter<I: IntoIterator<Item = (DeductionCode, Decimal)>>(iter: I) -> Self {
        DeductionSet(iter.into_iter().collect())
    }
}

/// A claim after eligibility and cap have been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AppliedDeduction {
    pub code: DeductionCode,
    #[schemars(with = "f64")]
    pub claimed: Decimal,
    #[schemars(with = "f64")]
    pub allowed: Decimal,
}

/// Clamp each eligible claim to its cap. Claims whose code has no cap, or
/// that `eligible` rejects, are dropped.
pub fn apply_caps(
    claims: &DeductionSet,
    caps: &BTreeMap<DeductionCode, Decimal>,
    eligible: impl Fn(DeductionCode) -> bool,
) -> Vec<AppliedDeduction> {
    claims
        .iter()
        .filter_map(|(code, claimed)| {
            if !eligible(code) {
                log::warn!("Deduction {} is not available here, ignoring claim of {}", code, claimed);
                return None;
            }
            let Some(cap) = caps.get(&code).copied() else {
                log::warn!("Deduction {} has no configured cap, ignoring claim of {}", code, claimed);
                return None;
            };
            let allowed = match code {
                DeductionCode::Standard if claimed > Decimal::ZERO => cap,
                DeductionCode::Standard => Decimal::ZERO,
                _ => claimed.min(cap),
            };
            if allowed < claimed && code != DeductionCode::Standard {
                log::debug!("Deduction {} claim {} clamped to cap {}", code, claimed, cap);
            }
            Some(AppliedDeduction {
                code,
                claimed,
                allowed,
            })
        })
        .collect()
}

pub fn total_allowed(applied: &[AppliedDeduction]) -> Decimal {
    applied.iter().map(|d| d.allowed).sum()
}
