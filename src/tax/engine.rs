//! Liability computation: deductions, slab tax, rebate, surcharge and cess,
//! for one regime or both side by side.

use super::cess;
use super::config::YearConfig;
use super::deductions::{self, AppliedDeduction, DeductionSet};
use super::error::ValidationError;
use super::india::{AgeBracket, Regime};
use super::regime::{NewRegime, OldRegime, RegimeStrategy};
use super::surcharge;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single taxpayer's figures for one assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxInput {
    /// Gross total income before deductions
    #[schemars(with = "f64")]
    pub gross_income: Decimal,
    /// Regime to compute under (ignored when comparing)
    #[serde(default)]
    pub regime: Regime,
    /// Required for the old regime
    #[serde(default)]
    pub age_bracket: Option<AgeBracket>,
    /// Claimed deductions by code
    #[serde(default)]
    pub deductions: DeductionSet,
}

impl TaxInput {
    pub fn new(gross_income: Decimal, regime: Regime) -> Self {
        TaxInput {
            gross_income,
            regime,
            age_bracket: None,
            deductions: DeductionSet::new(),
        }
    }

    pub fn age(mut self, age: AgeBracket) -> Self {
        self.age_bracket = Some(age);
        self
    }

    pub fn deductions(mut self, deductions: DeductionSet) -> Self {
        self.deductions = deductions;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.gross_income < Decimal::ZERO {
            return Err(ValidationError::NegativeIncome(self.gross_income));
        }
        self.deductions.validate()
    }
}

/// Liability under one regime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputationResult {
    pub regime: Regime,
    pub gross_income: Decimal,
    pub deductions: Vec<AppliedDeduction>,
    pub taxable_income: Decimal,
    pub slab_tax: Decimal,
    pub rebate: Decimal,
    pub tax_after_rebate: Decimal,
    pub surcharge: Decimal,
    pub surcharge_relief: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    /// Total tax as a fraction of gross income
    pub effective_rate: Decimal,
}

/// Both regimes side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeComparison {
    pub old: ComputationResult,
    pub new: ComputationResult,
    pub recommended: Regime,
    /// How much less the recommended regime costs
    pub savings: Decimal,
}

impl RegimeComparison {
    pub fn result(&self, regime: Regime) -> &ComputationResult {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }
}

/// Compute liability under `input.regime`
pub fn compute_tax(
    config: &YearConfig,
    input: &TaxInput,
) -> Result<ComputationResult, ValidationError> {
    input.validate()?;
    compute_regime(config, input, input.regime)
}

/// Compute both regimes and recommend the cheaper one. A tie goes to the
/// new regime.
pub fn compare_regimes(
    config: &YearConfig,
    input: &TaxInput,
) -> Result<RegimeComparison, ValidationError> {
    input.validate()?;
    let old = compute_regime(config, input, Regime::Old)?;
    let new = compute_regime(config, input, Regime::New)?;

    let recommended = if old.total_tax < new.total_tax {
        Regime::Old
    } else {
        Regime::New
    };
    let savings = (old.total_tax - new.total_tax).abs();
    log::info!(
        "{}: old regime {} vs new regime {}, recommending {}",
        config.assessment_year,
        old.total_tax,
        new.total_tax,
        recommended
    );

    Ok(RegimeComparison {
        old,
        new,
        recommended,
        savings,
    })
}

fn compute_regime(
    config: &YearConfig,
    input: &TaxInput,
    regime: Regime,
) -> Result<ComputationResult, ValidationError> {
    let rules = config.regime(regime);
    match regime {
        Regime::Old => {
            let age = input.age_bracket.ok_or(ValidationError::MissingAgeBracket)?;
            run_pipeline(&OldRegime::new(rules, age), config.cess_rate, input)
        }
        Regime::New => run_pipeline(&NewRegime::new(rules), config.cess_rate, input),
    }
}

fn run_pipeline(
    strategy: &dyn RegimeStrategy,
    cess_rate: Decimal,
    input: &TaxInput,
) -> Result<ComputationResult, ValidationError> {
    let regime = strategy.regime();
    let applied = strategy.deductions(&input.deductions);
    let taxable_income = (input.gross_income - deductions::total_allowed(&applied)).max(Decimal::ZERO);

    let slab_tax = strategy.slab_tax(taxable_income)?;
    let tax_after_rebate = strategy.tax_after_rebate(taxable_income)?;
    let rebate = slab_tax - tax_after_rebate;

    let band = strategy.surcharge_band(taxable_income);
    let outcome = surcharge::surcharge(tax_after_rebate, taxable_income, band, |income| {
        strategy.tax_after_rebate(income)
    })?;

    let cess = cess::cess(tax_after_rebate + outcome.surcharge, cess_rate);
    let total_tax = tax_after_rebate + outcome.surcharge + cess;
    let effective_rate = if input.gross_income.is_zero() {
        Decimal::ZERO
    } else {
        (total_tax / input.gross_income).round_dp(4)
    };

    log::debug!(
        "{} regime: taxable={}, slab={}, rebate={}, surcharge={}, cess={}, total={}",
        regime,
        taxable_income,
        slab_tax,
        rebate,
        outcome.surcharge,
        cess,
        total_tax
    );

    Ok(ComputationResult {
        regime,
        gross_income: input.gross_income,
        deductions: applied,
        taxable_income,
        slab_tax,
        rebate,
        tax_after_rebate,
        surcharge: outcome.surcharge,
        surcharge_relief: outcome.relief,
        cess,
        total_tax,
        effective_rate,
    })
}
