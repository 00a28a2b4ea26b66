//! Per-regime rules.
//!
//! Each regime decides which deductions it accepts, whether an age-based
//! exemption shifts the zero-rate floor and how surcharge behaves above the
//! top slab. Everything else is shared and lives in the default methods.

use super::config::{RegimeConfig, SurchargePolicy};
use super::deductions::{self, AppliedDeduction, DeductionCode, DeductionSet};
use super::error::ValidationError;
use super::india::{AgeBracket, Regime};
use super::rebate;
use super::slab;
use super::surcharge::{self, SurchargeBand};
use rust_decimal::Decimal;

pub trait RegimeStrategy {
    fn regime(&self) -> Regime;

    fn config(&self) -> &RegimeConfig;

    /// Whether a claim under `code` may be taken at all
    fn accepts(&self, code: DeductionCode) -> bool;

    /// Income below this is untaxed regardless of the first bracket
    fn exemption_floor(&self) -> Option<Decimal>;

    fn surcharge_band(&self, income: Decimal) -> Option<SurchargeBand>;

    fn deductions(&self, claims: &DeductionSet) -> Vec<AppliedDeduction> {
        deductions::apply_caps(claims, &self.config().deduction_caps, |code| {
            self.accepts(code)
        })
    }

    fn slab_tax(&self, income: Decimal) -> Result<Decimal, ValidationError> {
        slab::slab_tax(income, &self.config().brackets, self.exemption_floor())
    }

    fn tax_after_rebate(&self, income: Decimal) -> Result<Decimal, ValidationError> {
        let slab_tax = self.slab_tax(income)?;
        Ok(rebate::tax_after_rebate(
            slab_tax,
            income,
            &self.config().rebate,
        ))
    }
}

/// Legacy regime: itemized deductions, age exemption, fixed-cliff rebate and
/// a higher override rate at the very top
#[derive(Debug, Clone, Copy)]
pub struct OldRegime<'a> {
    config: &'a RegimeConfig,
    age: AgeBracket,
}

impl<'a> OldRegime<'a> {
    pub fn new(config: &'a RegimeConfig, age: AgeBracket) -> Self {
        OldRegime { config, age }
    }
}

impl RegimeStrategy for OldRegime<'_> {
    fn regime(&self) -> Regime {
        Regime::Old
    }

    fn config(&self) -> &RegimeConfig {
        self.config
    }

    fn accepts(&self, code: DeductionCode) -> bool {
        match code {
            DeductionCode::Section80Tta => !self.age.is_senior(),
            DeductionCode::Section80Ttb => self.age.is_senior(),
            _ => true,
        }
    }

    fn exemption_floor(&self) -> Option<Decimal> {
        self.config.exemption_floor(self.age)
    }

    fn surcharge_band(&self, income: Decimal) -> Option<SurchargeBand> {
        let slabs = &self.config.surcharge.slabs;
        match self.config.surcharge.policy {
            SurchargePolicy::Override { threshold, rate } => {
                surcharge::band_with_override(slabs, threshold, rate, income)
            }
            SurchargePolicy::Cap { .. } => surcharge::locate_band(slabs, income),
        }
    }
}

/// Default regime: standard deduction only, tapering rebate and a capped
/// surcharge rate
#[derive(Debug, Clone, Copy)]
pub struct NewRegime<'a> {
    config: &'a RegimeConfig,
}

impl<'a> NewRegime<'a> {
    pub fn new(config: &'a RegimeConfig) -> Self {
        NewRegime { config }
    }
}

impl RegimeStrategy for NewRegime<'_> {
    fn regime(&self) -> Regime {
        Regime::New
    }

    fn config(&self) -> &RegimeConfig {
        self.config
    }

    fn accepts(&self, code: DeductionCode) -> bool {
        code == DeductionCode::Standard
    }

    fn exemption_floor(&self) -> Option<Decimal> {
        None
    }

    fn surcharge_band(&self, income: Decimal) -> Option<SurchargeBand> {
        let slabs = &self.config.surcharge.slabs;
        match self.config.surcharge.policy {
            SurchargePolicy::Cap { max_rate } => surcharge::band_with_cap(slabs, max_rate, income),
            SurchargePolicy::Override { .. } => surcharge::locate_band(slabs, income),
        }
    }
}
