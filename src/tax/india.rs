use super::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tax computation scheme. The two are mutually exclusive for a given year.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Legacy regime with itemized deductions and age-based exemption
    Old,
    /// Default regime with lower rates and only the standard deduction
    #[default]
    New,
}

impl Regime {
    pub fn display(&self) -> &'static str {
        match self {
            Regime::Old => "old",
            Regime::New => "new",
        }
    }
}

impl FromStr for Regime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "old" => Ok(Regime::Old),
            "new" => Ok(Regime::New),
            other => Err(ValidationError::UnknownRegime(other.to_string())),
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Age of the taxpayer at any time during the financial year
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum AgeBracket {
    #[serde(rename = "below60")]
    Below60,
    #[serde(rename = "60to80")]
    Senior,
    #[serde(rename = "above80")]
    SuperSenior,
}

impl AgeBracket {
    pub fn display(&self) -> &'static str {
        match self {
            AgeBracket::Below60 => "below60",
            AgeBracket::Senior => "60to80",
            AgeBracket::SuperSenior => "above80",
        }
    }

    pub fn is_senior(&self) -> bool {
        !matches!(self, AgeBracket::Below60)
    }
}

impl FromStr for AgeBracket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "below60" => Ok(AgeBracket::Below60),
            "60to80" => Ok(AgeBracket::Senior),
            "above80" => Ok(AgeBracket::SuperSenior),
            other => Err(ValidationError::UnknownAgeBracket(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Indian Assessment Year (runs 1 April to 31 March)
/// The year value represents the end year (e.g., 2027 = AY 2026-27, which
/// assesses income earned in FY 2025-26)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct AssessmentYear(pub i32);

impl AssessmentYear {
    /// Assessment year in which income earned on `date` is assessed
    pub fn from_income_date(date: NaiveDate) -> Self {
        let year = date.year();
        // Financial year starts 1 April and is assessed in the following year
        if date.month() >= 4 {
            AssessmentYear(year + 2)
        } else {
            AssessmentYear(year + 1)
        }
    }

    /// First day of the financial year assessed in this year
    pub fn income_start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 2, 4, 1)
    }

    /// Last day of the financial year assessed in this year
    pub fn income_end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 3, 31)
    }

    /// Display as "2026-27" format
    pub fn display(&self) -> String {
        format!("{}-{:02}", self.0 - 1, self.0 % 100)
    }

    /// Financial year displayed as "2025-26"
    pub fn financial_year(&self) -> String {
        format!("{}-{:02}", self.0 - 2, (self.0 - 1) % 100)
    }
}

impl FromStr for AssessmentYear {
    type Err = ValidationError;

    /// Accepts either the end year ("2027") or the AY label ("2026-27").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAssessmentYear(s.to_string());
        let s = s.trim().trim_start_matches("AY").trim();
        match s.split_once('-') {
            None => s.parse::<i32>().map(AssessmentYear).map_err(|_| invalid()),
            Some((start, end)) => {
                let start = start.parse::<i32>().map_err(|_| invalid())?;
                let end = end.parse::<i32>().map_err(|_| invalid())?;
                if (start + 1) % 100 != end % 100 {
                    return Err(invalid());
                }
                Ok(AssessmentYear(start + 1))
            }
        }
    }
}

impl std::fmt::Display for AssessmentYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
