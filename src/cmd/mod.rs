pub mod batch;
pub mod compare;
pub mod compute;
pub mod schema;
pub mod slabs;

use anyhow::Context;
use clap::{Args, ValueEnum};
use itax::tax::{
    AgeBracket, AssessmentYear, DeductionCode, DeductionSet, Regime, TaxInput, TaxTable,
    ValidationError, YearConfig, BUILTIN,
};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Load the tax table from `path`, or fall back to the built-in rates
pub fn load_table(path: Option<&Path>) -> anyhow::Result<Cow<'static, TaxTable>> {
    match path {
        None => Ok(Cow::Borrowed(&*BUILTIN)),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open tax table {}", path.display()))?;
            let table = TaxTable::from_json_reader(BufReader::new(file))
                .with_context(|| format!("Invalid tax table {}", path.display()))?;
            log::info!(
                "Loaded {} assessment year(s) from {}",
                table.years.len(),
                path.display()
            );
            Ok(Cow::Owned(table))
        }
    }
}

/// Rates for `year`, or for the year in which income earned today is
/// assessed. Falls back to the latest year in the table.
pub fn select_year(table: &TaxTable, year: Option<AssessmentYear>) -> anyhow::Result<&YearConfig> {
    if let Some(year) = year {
        return Ok(table
            .year(year)
            .ok_or(ValidationError::UnsupportedYear(year))?);
    }
    let current = AssessmentYear::from_income_date(chrono::Local::now().date_naive());
    match table.year(current) {
        Some(config) => Ok(config),
        None => {
            let latest = table.latest().context("Tax table has no assessment years")?;
            log::warn!(
                "No rates for AY {}, using latest configured AY {}",
                current,
                latest.assessment_year
            );
            Ok(latest)
        }
    }
}

/// Read a JSON taxpayer input from a file (or stdin with "-")
pub fn read_input(path: &Path) -> anyhow::Result<TaxInput> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        BufReader::new(io::stdin().lock()).read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(serde_json::from_slice(&buffer)?)
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input {}", path.display()))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RegimeArg {
    Old,
    #[default]
    New,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Old => Regime::Old,
            RegimeArg::New => Regime::New,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AgeArg {
    #[value(name = "below60")]
    Below60,
    #[value(name = "60to80")]
    Senior,
    #[value(name = "above80")]
    SuperSenior,
}

impl From<AgeArg> for AgeBracket {
    fn from(arg: AgeArg) -> Self {
        match arg {
            AgeArg::Below60 => AgeBracket::Below60,
            AgeArg::Senior => AgeBracket::Senior,
            AgeArg::SuperSenior => AgeBracket::SuperSenior,
        }
    }
}

/// Taxpayer figures, given either as flags or as a JSON input file
#[derive(Args, Debug)]
pub struct TaxpayerArgs {
    /// Gross total income in rupees
    #[arg(short, long, required_unless_present = "input")]
    income: Option<Decimal>,

    /// Age bracket (required for the old regime)
    #[arg(short, long, value_enum)]
    age: Option<AgeArg>,

    /// Deduction claim as CODE=AMOUNT (e.g. 80C=150000). Repeatable.
    #[arg(short, long = "deduction", value_parser = parse_deduction)]
    deductions: Vec<(DeductionCode, Decimal)>,

    /// Claim the standard deduction for salaried income
    #[arg(short, long)]
    standard_deduction: bool,

    /// JSON file with the taxpayer input (or "-" for stdin)
    #[arg(long, conflicts_with = "income")]
    input: Option<PathBuf>,

    /// Assessment year (e.g. 2027 or 2026-27). Defaults to the current one.
    #[arg(short, long)]
    pub year: Option<AssessmentYear>,
}

impl TaxpayerArgs {
    pub fn to_input(&self, regime: Regime) -> anyhow::Result<TaxInput> {
        if let Some(path) = &self.input {
            return read_input(path);
        }
        let income = self.income.context("--income is required")?;

        let mut deductions: DeductionSet = self.deductions.iter().copied().collect();
        if self.standard_deduction {
            deductions = deductions.with_standard_deduction();
        }
        let mut input = TaxInput::new(income, regime).deductions(deductions);
        if let Some(age) = self.age {
            input = input.age(age.into());
        }
        Ok(input)
    }
}

fn parse_deduction(s: &str) -> Result<(DeductionCode, Decimal), String> {
    let (code, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=AMOUNT, got '{}'", s))?;
    let code = code.parse::<DeductionCode>().map_err(|e| e.to_string())?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;
    Ok((code, amount))
}
