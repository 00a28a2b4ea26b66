//! Compare command - both regimes side by side with a recommendation

use super::{select_year, TaxpayerArgs};
use clap::Args;
use itax::money::{format_inr, format_pct};
use itax::tax::{compare_regimes, ComputationResult, RegimeComparison, TaxTable};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CompareCommand {
    #[command(flatten)]
    taxpayer: TaxpayerArgs,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Old regime")]
    old: String,
    #[tabled(rename = "New regime")]
    new: String,
}

impl CompareCommand {
    pub fn exec(&self, table: &TaxTable) -> anyhow::Result<()> {
        let config = select_year(table, self.taxpayer.year)?;
        let input = self.taxpayer.to_input(Default::default())?;
        let comparison = compare_regimes(config, &input)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
            return Ok(());
        }

        println!();
        println!(
            "REGIME COMPARISON (AY {}, FY {})",
            config.assessment_year,
            config.assessment_year.financial_year()
        );
        let mut table = Table::new(rows(&comparison));
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
        println!("{}", table);
        println!();

        if comparison.savings.is_zero() {
            println!(
                "Both regimes cost the same; {} regime recommended",
                comparison.recommended
            );
        } else {
            println!(
                "{} regime recommended, saving {}",
                comparison.recommended.display().to_uppercase(),
                format_inr(comparison.savings)
            );
        }
        println!();
        Ok(())
    }
}

fn rows(comparison: &RegimeComparison) -> Vec<ComparisonRow> {
    let amount = |label, field: fn(&ComputationResult) -> Decimal| ComparisonRow {
        label,
        old: format_inr(field(&comparison.old)),
        new: format_inr(field(&comparison.new)),
    };
    vec![
        amount("Gross income", |r| r.gross_income),
        amount("Deductions", |r| r.gross_income - r.taxable_income),
        amount("Taxable income", |r| r.taxable_income),
        amount("Slab tax", |r| r.slab_tax),
        amount("Rebate u/s 87A", |r| r.rebate),
        amount("Surcharge", |r| r.surcharge),
        amount("Cess", |r| r.cess),
        amount("Total tax", |r| r.total_tax),
        ComparisonRow {
            label: "Effective rate",
            old: format_pct(comparison.old.effective_rate),
            new: format_pct(comparison.new.effective_rate),
        },
    ]
}
