//! Schema command - print expected input formats

use clap::Args;
use itax::tax::{TaxInput, TaxTable};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "input")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a taxpayer input file
    Input,
    /// JSON Schema for a tax table passed with --config
    Config,
    /// CSV header row accepted by the batch command
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::Input => {
                let schema = schema_for!(TaxInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::Config => {
                let schema = schema_for!(TaxTable);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
        Ok(())
    }

    fn print_csv_header(&self) {
        let columns: Vec<&str> = CSV_FIELD_DESCRIPTIONS
            .iter()
            .map(|(name, _, _)| *name)
            .collect();
        println!("{}", columns.join(","));
    }

    fn print_csv_fields(&self) {
        println!("CSV Input Format");
        println!("================");
        println!();
        for (name, required, description) in CSV_FIELD_DESCRIPTIONS {
            let req = if *required { "required" } else { "optional" };
            println!("{:20} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Amounts are in rupees. Deduction columns hold the amount claimed.");
    }
}

const CSV_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("id", false, "Identifier echoed in the output row"),
    (
        "year",
        false,
        "Assessment year (2027 or 2026-27), overrides --year",
    ),
    ("gross_income", true, "Gross total income before deductions"),
    (
        "age_bracket",
        false,
        "below60, 60to80 or above80 (needed for the old regime)",
    ),
    (
        "standard_deduction",
        false,
        "true to claim the standard deduction",
    ),
    ("80C", false, "Section 80C investments"),
    ("80TTA", false, "Savings interest (below 60 only)"),
    ("80TTB", false, "Deposit interest (senior citizens only)"),
    ("80CCD1B", false, "Additional NPS contribution"),
    ("24B", false, "Home loan interest on a self-occupied house"),
];
