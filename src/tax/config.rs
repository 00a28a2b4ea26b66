//! Versioned rate tables, keyed by assessment year.
//!
//! Tables are validated once when loaded and never mutated afterwards. The
//! built-in table covers the years the calculator ships with; a replacement
//! can be loaded from JSON at startup.

use super::deductions::DeductionCode;
use super::error::ConfigError;
use super::india::{AgeBracket, AssessmentYear, Regime};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;

/// Table shipped with the calculator
pub static BUILTIN: Lazy<TaxTable> = Lazy::new(TaxTable::builtin);

/// Upper edge of a bracket. The top bracket has no upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UpperBound {
    Bounded(#[schemars(with = "f64")] Decimal),
    Unbounded,
}

/// Income range taxed at a single marginal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bracket {
    pub upper_bound: UpperBound,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl Bracket {
    pub fn upto(upper: Decimal, rate: Decimal) -> Self {
        Bracket {
            upper_bound: UpperBound::Bounded(upper),
            rate,
        }
    }

    pub fn above(rate: Decimal) -> Self {
        Bracket {
            upper_bound: UpperBound::Unbounded,
            rate,
        }
    }
}

/// Section 87A rebate policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum RebateRule {
    /// Rebate up to `amount` while income stays within `income_limit`;
    /// nothing at all above it
    Fixed {
        #[schemars(with = "f64")]
        income_limit: Decimal,
        #[schemars(with = "f64")]
        amount: Decimal,
    },
    /// Full rebate within `income_limit`, tapering above it so tax never
    /// exceeds the income over the limit
    Marginal {
        #[schemars(with = "f64")]
        income_limit: Decimal,
    },
}

/// Surcharge rate that applies once income reaches `min_income`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SurchargeSlab {
    #[schemars(with = "f64")]
    pub min_income: Decimal,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

/// How the surcharge behaves at the top end of the slab table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum SurchargePolicy {
    /// Above `threshold` a higher fixed `rate` replaces the slab rate
    Override {
        #[schemars(with = "f64")]
        threshold: Decimal,
        #[schemars(with = "f64")]
        rate: Decimal,
    },
    /// Slab rates are clamped to `max_rate`
    Cap {
        #[schemars(with = "f64")]
        max_rate: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SurchargeSchedule {
    pub slabs: Vec<SurchargeSlab>,
    pub policy: SurchargePolicy,
}

/// Rates and limits for one regime in one assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegimeConfig {
    pub regime: Regime,
    pub brackets: Vec<Bracket>,
    /// Income below the floor is untaxed, whatever the first bracket says
    #[serde(default)]
    #[schemars(with = "BTreeMap<AgeBracket, f64>")]
    pub age_exemptions: BTreeMap<AgeBracket, Decimal>,
    pub rebate: RebateRule,
    pub surcharge: SurchargeSchedule,
    /// Maximum allowed per deduction code. Codes absent here cannot be
    /// claimed under this regime
    #[schemars(with = "BTreeMap<DeductionCode, f64>")]
    pub deduction_caps: BTreeMap<DeductionCode, Decimal>,
}

/// Both regimes plus the shared cess for one assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct YearConfig {
    pub assessment_year: AssessmentYear,
    #[schemars(with = "f64")]
    pub cess_rate: Decimal,
    pub old: RegimeConfig,
    pub new: RegimeConfig,
}

/// All supported assessment years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxTable {
    pub years: Vec<YearConfig>,
}

impl TaxTable {
    /// Read and validate a table from JSON
    pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let table: TaxTable = serde_json::from_reader(reader)?;
        table.validate()?;
        log::debug!(
            "Loaded tax table with {} assessment year(s)",
            table.years.len()
        );
        Ok(table)
    }

    pub fn year(&self, year: AssessmentYear) -> Option<&YearConfig> {
        self.years.iter().find(|y| y.assessment_year == year)
    }

    /// Most recent assessment year in the table
    pub fn latest(&self) -> Option<&YearConfig> {
        self.years.iter().max_by_key(|y| y.assessment_year)
    }

    /// SHA-256 of the canonical JSON form, identifying this table version
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        let mut seen = HashSet::new();
        for year in &self.years {
            if !seen.insert(year.assessment_year) {
                return Err(ConfigError::DuplicateYear(year.assessment_year));
            }
            year.validate()?;
        }
        Ok(())
    }

    fn builtin() -> Self {
        TaxTable {
            years: vec![
                YearConfig {
                    assessment_year: AssessmentYear(2026),
                    cess_rate: dec!(0.04),
                    old: old_regime(),
                    new: RegimeConfig {
                        regime: Regime::New,
                        brackets: vec![
                            Bracket::upto(dec!(300000), dec!(0)),
                            Bracket::upto(dec!(700000), dec!(0.05)),
                            Bracket::upto(dec!(1000000), dec!(0.10)),
                            Bracket::upto(dec!(1200000), dec!(0.15)),
                            Bracket::upto(dec!(1500000), dec!(0.20)),
                            Bracket::above(dec!(0.30)),
                        ],
                        age_exemptions: BTreeMap::new(),
                        rebate: RebateRule::Marginal {
                            income_limit: dec!(700000),
                        },
                        surcharge: new_regime_surcharge(),
                        deduction_caps: BTreeMap::from([(DeductionCode::Standard, dec!(75000))]),
                    },
                },
                YearConfig {
                    assessment_year: AssessmentYear(2027),
                    cess_rate: dec!(0.04),
                    old: old_regime(),
                    new: RegimeConfig {
                        regime: Regime::New,
                        brackets: vec![
                            Bracket::upto(dec!(400000), dec!(0)),
                            Bracket::upto(dec!(800000), dec!(0.05)),
                            Bracket::upto(dec!(1200000), dec!(0.10)),
                            Bracket::upto(dec!(1600000), dec!(0.15)),
                            Bracket::upto(dec!(2000000), dec!(0.20)),
                            Bracket::upto(dec!(2400000), dec!(0.25)),
                            Bracket::above(dec!(0.30)),
                        ],
                        age_exemptions: BTreeMap::new(),
                        rebate: RebateRule::Marginal {
                            income_limit: dec!(1200000),
                        },
                        surcharge: new_regime_surcharge(),
                        deduction_caps: BTreeMap::from([(DeductionCode::Standard, dec!(75000))]),
                    },
                },
            ],
        }
    }
}

// Old regime rates have been unchanged for several years
fn old_regime() -> RegimeConfig {
    RegimeConfig {
        regime: Regime::Old,
        brackets: vec![
            Bracket::upto(dec!(250000), dec!(0)),
            Bracket::upto(dec!(500000), dec!(0.05)),
            Bracket::upto(dec!(1000000), dec!(0.20)),
            Bracket::above(dec!(0.30)),
        ],
        age_exemptions: BTreeMap::from([
            (AgeBracket::Below60, dec!(250000)),
            (AgeBracket::Senior, dec!(300000)),
            (AgeBracket::SuperSenior, dec!(500000)),
        ]),
        rebate: RebateRule::Fixed {
            income_limit: dec!(500000),
            amount: dec!(12500),
        },
        surcharge: SurchargeSchedule {
            slabs: surcharge_slabs(),
            policy: SurchargePolicy::Override {
                threshold: dec!(50000000),
                rate: dec!(0.37),
            },
        },
        deduction_caps: BTreeMap::from([
            (DeductionCode::Standard, dec!(50000)),
            (DeductionCode::Section80C, dec!(150000)),
            (DeductionCode::Section80Tta, dec!(10000)),
            (DeductionCode::Section80Ttb, dec!(50000)),
            (DeductionCode::Nps, dec!(50000)),
            (DeductionCode::HomeLoanInterest, dec!(200000)),
        ]),
    }
}

fn new_regime_surcharge() -> SurchargeSchedule {
    SurchargeSchedule {
        slabs: surcharge_slabs(),
        policy: SurchargePolicy::Cap {
            max_rate: dec!(0.25),
        },
    }
}

fn surcharge_slabs() -> Vec<SurchargeSlab> {
    vec![
        SurchargeSlab {
            min_income: dec!(5000000),
            rate: dec!(0.10),
        },
        SurchargeSlab {
            min_income: dec!(10000000),
            rate: dec!(0.15),
        },
        SurchargeSlab {
            min_income: dec!(20000000),
            rate: dec!(0.25),
        },
    ]
}

impl YearConfig {
    pub fn regime(&self, regime: Regime) -> &RegimeConfig {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_fraction(self.cess_rate) {
            return Err(ConfigError::InvalidCessRate {
                year: self.assessment_year,
                rate: self.cess_rate,
            });
        }
        for (expected, config) in [(Regime::Old, &self.old), (Regime::New, &self.new)] {
            if config.regime != expected {
                return Err(ConfigError::MislabelledRegime {
                    year: self.assessment_year,
                    found: config.regime,
                });
            }
            config.validate()?;
        }
        Ok(())
    }
}

impl RegimeConfig {
    /// Age-based exemption floor. Only the old regime defines any.
    pub fn exemption_floor(&self, age: AgeBracket) -> Option<Decimal> {
        self.age_exemptions.get(&age).copied()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_brackets()?;
        self.validate_rebate()?;
        self.validate_surcharge()?;

        let regime = self.regime;
        let negative = |field: String| ConfigError::NegativeAmount { regime, field };
        if let Some((age, _)) = self.age_exemptions.iter().find(|(_, v)| **v < Decimal::ZERO) {
            return Err(negative(format!("age exemption {}", age)));
        }
        if let Some((code, _)) = self.deduction_caps.iter().find(|(_, v)| **v < Decimal::ZERO) {
            return Err(negative(format!("deduction cap {}", code)));
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), ConfigError> {
        let regime = self.regime;
        let last = match self.brackets.len() {
            0 => return Err(ConfigError::NoBrackets { regime }),
            n => n - 1,
        };

        let mut previous_upper = Decimal::ZERO;
        let mut previous_rate = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            match bracket.upper_bound {
                UpperBound::Bounded(_) if index == last => {
                    return Err(ConfigError::MissingUnboundedBracket { regime })
                }
                UpperBound::Bounded(upper) if upper <= previous_upper => {
                    return Err(ConfigError::UnorderedBrackets { regime, index })
                }
                UpperBound::Bounded(upper) => previous_upper = upper,
                UpperBound::Unbounded if index != last => {
                    return Err(ConfigError::UnboundedNotLast { regime, index })
                }
                UpperBound::Unbounded => {}
            }
            if bracket.rate < Decimal::ZERO {
                return Err(ConfigError::NegativeRate {
                    regime,
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(ConfigError::DecreasingRate {
                    regime,
                    index,
                    rate: bracket.rate,
                });
            }
            previous_rate = bracket.rate;
        }
        Ok(())
    }

    fn validate_rebate(&self) -> Result<(), ConfigError> {
        let regime = self.regime;
        let (expected, limit, amount) = match (regime, self.rebate) {
            (Regime::Old, RebateRule::Fixed { income_limit, amount }) => {
                (None, income_limit, amount)
            }
            (Regime::New, RebateRule::Marginal { income_limit }) => {
                (None, income_limit, Decimal::ZERO)
            }
            (Regime::Old, _) => (Some("Fixed"), Decimal::ZERO, Decimal::ZERO),
            (Regime::New, _) => (Some("Marginal"), Decimal::ZERO, Decimal::ZERO),
        };
        if let Some(expected) = expected {
            return Err(ConfigError::WrongRebateRule { regime, expected });
        }
        if limit < Decimal::ZERO || amount < Decimal::ZERO {
            return Err(ConfigError::NegativeAmount {
                regime,
                field: "rebate".to_string(),
            });
        }
        Ok(())
    }

    fn validate_surcharge(&self) -> Result<(), ConfigError> {
        let regime = self.regime;
        let slabs = &self.surcharge.slabs;
        for (index, slab) in slabs.iter().enumerate() {
            let ordered = match index {
                0 => slab.min_income >= Decimal::ZERO,
                _ => slab.min_income > slabs[index - 1].min_income,
            };
            if !ordered {
                return Err(ConfigError::UnorderedSurchargeSlabs { regime, index });
            }
            if !is_fraction(slab.rate) {
                return Err(ConfigError::InvalidSurchargeRate {
                    regime,
                    index,
                    rate: slab.rate,
                });
            }
        }

        let top_slab = slabs.last();
        match (regime, self.surcharge.policy) {
            (Regime::Old, SurchargePolicy::Override { threshold, rate }) => {
                if top_slab.is_some_and(|s| threshold <= s.min_income) {
                    return Err(ConfigError::OverrideBelowTopSlab { regime, threshold });
                }
                if !is_fraction(rate) || top_slab.is_some_and(|s| rate < s.rate) {
                    return Err(ConfigError::InvalidSurchargeRate {
                        regime,
                        index: slabs.len(),
                        rate,
                    });
                }
                Ok(())
            }
            (Regime::New, SurchargePolicy::Cap { max_rate }) => {
                if !is_fraction(max_rate) {
                    return Err(ConfigError::InvalidSurchargeCap {
                        regime,
                        rate: max_rate,
                    });
                }
                Ok(())
            }
            (Regime::Old, _) => Err(ConfigError::WrongSurchargePolicy {
                regime,
                expected: "Override",
            }),
            (Regime::New, _) => Err(ConfigError::WrongSurchargePolicy {
                regime,
                expected: "Cap",
            }),
        }
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ay2027() -> YearConfig {
        BUILTIN.year(AssessmentYear(2027)).unwrap().clone()
    }

    #[test]
    fn builtin_table_is_valid() {
        assert_eq!(BUILTIN.validate(), Ok(()));
        assert_eq!(BUILTIN.latest().unwrap().assessment_year, AssessmentYear(2027));
        assert!(BUILTIN.year(AssessmentYear(2026)).is_some());
        assert!(BUILTIN.year(AssessmentYear(2020)).is_none());
    }

    #[test]
    fn fingerprint_is_stable_and_changes_with_content() {
        let fp = BUILTIN.fingerprint().unwrap();
        assert_eq!(fp.len(), 64);
        assert_eq!(fp, BUILTIN.fingerprint().unwrap());

        let mut changed = BUILTIN.clone();
        changed.years[0].cess_rate = dec!(0.03);
        assert_ne!(fp, changed.fingerprint().unwrap());
    }

    #[test]
    fn json_round_trip_preserves_table() {
        let json = serde_json::to_string(&*BUILTIN).unwrap();
        let loaded = TaxTable::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(loaded, *BUILTIN);
    }

    #[test]
    fn unbounded_bracket_must_be_last() {
        let mut year = ay2027();
        year.old.brackets.swap(2, 3);
        assert_eq!(
            year.validate(),
            Err(ConfigError::UnboundedNotLast {
                regime: Regime::Old,
                index: 2
            })
        );
    }

    #[test]
    fn missing_unbounded_bracket_rejected() {
        let mut year = ay2027();
        year.old.brackets.pop();
        assert_eq!(
            year.validate(),
            Err(ConfigError::MissingUnboundedBracket {
                regime: Regime::Old
            })
        );
    }

    #[test]
    fn unordered_brackets_rejected() {
        let mut year = ay2027();
        year.new.brackets[1] = Bracket::upto(dec!(400000), dec!(0.05));
        assert_eq!(
            year.validate(),
            Err(ConfigError::UnorderedBrackets {
                regime: Regime::New,
                index: 1
            })
        );
    }

    #[test]
    fn decreasing_rates_rejected() {
        let mut year = ay2027();
        year.old.brackets[2].rate = dec!(0.01);
        assert_eq!(
            year.validate(),
            Err(ConfigError::DecreasingRate {
                regime: Regime::Old,
                index: 2,
                rate: dec!(0.01)
            })
        );
    }

    #[test]
    fn negative_rate_rejected() {
        let mut year = ay2027();
        year.old.brackets[0].rate = dec!(-0.05);
        assert!(matches!(
            year.validate(),
            Err(ConfigError::NegativeRate { index: 0, .. })
        ));
    }

    #[test]
    fn surcharge_policy_must_match_regime() {
        let mut year = ay2027();
        year.new.surcharge.policy = year.old.surcharge.policy;
        assert_eq!(
            year.validate(),
            Err(ConfigError::WrongSurchargePolicy {
                regime: Regime::New,
                expected: "Cap"
            })
        );
    }

    #[test]
    fn surcharge_cap_must_be_a_fraction() {
        let mut year = ay2027();
        year.new.surcharge.policy = SurchargePolicy::Cap {
            max_rate: dec!(1.5),
        };
        assert!(matches!(
            year.validate(),
            Err(ConfigError::InvalidSurchargeCap { .. })
        ));
    }

    #[test]
    fn override_threshold_must_exceed_top_slab() {
        let mut year = ay2027();
        year.old.surcharge.policy = SurchargePolicy::Override {
            threshold: dec!(20000000),
            rate: dec!(0.37),
        };
        assert!(matches!(
            year.validate(),
            Err(ConfigError::OverrideBelowTopSlab { .. })
        ));
    }

    #[test]
    fn rebate_rule_must_match_regime() {
        let mut year = ay2027();
        year.old.rebate = RebateRule::Marginal {
            income_limit: dec!(500000),
        };
        assert_eq!(
            year.validate(),
            Err(ConfigError::WrongRebateRule {
                regime: Regime::Old,
                expected: "Fixed"
            })
        );
    }

    #[test]
    fn duplicate_years_rejected() {
        let table = TaxTable {
            years: vec![ay2027(), ay2027()],
        };
        assert_eq!(
            table.validate(),
            Err(ConfigError::DuplicateYear(AssessmentYear(2027)))
        );
        assert_eq!(
            TaxTable { years: vec![] }.validate(),
            Err(ConfigError::EmptyTable)
        );
    }

    #[test]
    fn mislabelled_regime_rejected() {
        let mut year = ay2027();
        year.old.regime = Regime::New;
        assert!(matches!(
            year.validate(),
            Err(ConfigError::MislabelledRegime { .. })
        ));
    }

    #[test]
    fn upper_bound_json_form() {
        let json = serde_json::to_string(&Bracket::above(dec!(0.3))).unwrap();
        assert_eq!(json, r#"{"upper_bound":"unbounded","rate":"0.3"}"#);
        let bracket: Bracket =
            serde_json::from_str(r#"{"upper_bound":{"bounded":250000},"rate":0}"#).unwrap();
        assert_eq!(bracket, Bracket::upto(dec!(250000), dec!(0)));
    }
}
