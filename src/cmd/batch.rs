//! Batch command - compare regimes for every row of a CSV file

use super::select_year;
use anyhow::Context;
use clap::Args;
use itax::tax::{
    compare_regimes, AgeBracket, AssessmentYear, DeductionCode, DeductionSet, Regime, TaxInput,
    TaxTable,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file with one taxpayer per row. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Assessment year for rows without a year column
    #[arg(short, long)]
    year: Option<AssessmentYear>,
}

/// One input row. Column names are listed by `itax schema csv-fields`.
#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    year: Option<String>,
    gross_income: Decimal,
    #[serde(default)]
    age_bracket: Option<AgeBracket>,
    #[serde(default)]
    standard_deduction: Option<bool>,
    #[serde(default, rename = "80C")]
    section_80c: Option<Decimal>,
    #[serde(default, rename = "80TTA")]
    section_80tta: Option<Decimal>,
    #[serde(default, rename = "80TTB")]
    section_80ttb: Option<Decimal>,
    #[serde(default, rename = "80CCD1B")]
    nps: Option<Decimal>,
    #[serde(default, rename = "24B")]
    home_loan_interest: Option<Decimal>,
}

impl BatchRow {
    fn to_input(&self) -> TaxInput {
        let claims = [
            (DeductionCode::Section80C, self.section_80c),
            (DeductionCode::Section80Tta, self.section_80tta),
            (DeductionCode::Section80Ttb, self.section_80ttb),
            (DeductionCode::Nps, self.nps),
            (DeductionCode::HomeLoanInterest, self.home_loan_interest),
        ];
        let mut deductions: DeductionSet = claims
            .into_iter()
            .filter_map(|(code, amount)| amount.map(|amount| (code, amount)))
            .collect();
        if self.standard_deduction.unwrap_or(false) {
            deductions = deductions.with_standard_deduction();
        }

        let input = TaxInput::new(self.gross_income, Regime::default()).deductions(deductions);
        match self.age_bracket {
            Some(age) => input.age(age),
            None => input,
        }
    }
}

/// One output row. Rows that fail validation carry only `id` and `error`.
#[derive(Debug, Default, Serialize)]
struct BatchResult {
    id: String,
    assessment_year: String,
    taxable_income_old: Option<Decimal>,
    taxable_income_new: Option<Decimal>,
    total_tax_old: Option<Decimal>,
    total_tax_new: Option<Decimal>,
    recommended: Option<Regime>,
    savings: Option<Decimal>,
    error: Option<String>,
}

impl BatchCommand {
    pub fn exec(&self, table: &TaxTable) -> anyhow::Result<()> {
        let reader = open(&self.file)?;
        let mut rdr = csv::Reader::from_reader(reader);
        let mut wtr = csv::Writer::from_writer(io::stdout().lock());

        let mut failed = 0;
        for (index, row) in rdr.deserialize::<BatchRow>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let row = row.with_context(|| format!("Malformed CSV row at line {}", line))?;
            let id = row.id.clone().unwrap_or_else(|| line.to_string());
            let result = self.evaluate(table, &row, id);
            if let Some(error) = &result.error {
                log::warn!("Row {} rejected: {}", result.id, error);
                failed += 1;
            }
            wtr.serialize(result)?;
        }
        wtr.flush()?;

        if failed > 0 {
            log::warn!("{} row(s) could not be computed", failed);
        }
        Ok(())
    }

    fn evaluate(&self, table: &TaxTable, row: &BatchRow, id: String) -> BatchResult {
        let outcome = row
            .year
            .as_deref()
            .filter(|year| !year.trim().is_empty())
            .map(str::parse::<AssessmentYear>)
            .transpose()
            .map_err(anyhow::Error::from)
            .and_then(|year| select_year(table, year.or(self.year)))
            .and_then(|config| {
                let comparison = compare_regimes(config, &row.to_input())?;
                Ok((config.assessment_year, comparison))
            });

        match outcome {
            Ok((year, comparison)) => BatchResult {
                id,
                assessment_year: year.display(),
                taxable_income_old: Some(comparison.old.taxable_income),
                taxable_income_new: Some(comparison.new.taxable_income),
                total_tax_old: Some(comparison.old.total_tax),
                total_tax_new: Some(comparison.new.total_tax),
                recommended: Some(comparison.recommended),
                savings: Some(comparison.savings),
                error: None,
            },
            Err(e) => BatchResult {
                id,
                error: Some(e.to_string()),
                ..Default::default()
            },
        }
    }
}

fn open(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
