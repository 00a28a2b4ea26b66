//! Compute command - liability under one regime

use super::{select_year, RegimeArg, TaxpayerArgs};
use clap::Args;
use itax::money::{format_inr, format_pct};
use itax::tax::slab::{slab_breakdown, BracketShare};
use itax::tax::{compute_tax, ComputationResult, Regime, TaxInput, TaxTable, YearConfig};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    #[command(flatten)]
    taxpayer: TaxpayerArgs,

    /// Regime to compute under
    #[arg(short, long, value_enum, default_value_t = RegimeArg::New)]
    regime: RegimeArg,

    /// Show how taxable income splits across the slabs
    #[arg(long)]
    explain: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct SlabRow {
    #[tabled(rename = "Slab")]
    slab: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed")]
    taxed: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl From<&BracketShare> for SlabRow {
    fn from(share: &BracketShare) -> Self {
        let slab = match share.upper {
            Some(upper) => format!("{} - {}", format_inr(share.lower), format_inr(upper)),
            None => format!("above {}", format_inr(share.lower)),
        };
        SlabRow {
            slab,
            rate: format_pct(share.rate),
            taxed: format_inr(share.taxed_amount),
            tax: format_inr(share.tax.round_dp(2)),
        }
    }
}

impl ComputeCommand {
    pub fn exec(&self, table: &TaxTable) -> anyhow::Result<()> {
        let config = select_year(table, self.taxpayer.year)?;
        let input = self.taxpayer.to_input(self.regime.into())?;
        let result = compute_tax(config, &input)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        print_result(config, &result);
        if self.explain {
            self.print_breakdown(config, &input, &result)?;
        }
        Ok(())
    }

    fn print_breakdown(
        &self,
        config: &YearConfig,
        input: &TaxInput,
        result: &ComputationResult,
    ) -> anyhow::Result<()> {
        let rules = config.regime(result.regime);
        let floor = match result.regime {
            Regime::Old => input.age_bracket.and_then(|age| rules.exemption_floor(age)),
            Regime::New => None,
        };
        let shares = slab_breakdown(result.taxable_income, &rules.brackets, floor)?;
        let rows: Vec<SlabRow> = shares.iter().map(SlabRow::from).collect();

        println!("SLAB BREAKDOWN");
        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
        println!("{}", table);
        println!();
        Ok(())
    }
}

fn print_result(config: &YearConfig, result: &ComputationResult) {
    println!();
    println!(
        "{} REGIME (AY {}, FY {})",
        result.regime.display().to_uppercase(),
        config.assessment_year,
        config.assessment_year.financial_year()
    );
    println!();
    println!("  Gross income:       {}", format_inr(result.gross_income));
    for deduction in &result.deductions {
        println!(
            "  Deduction {:9} -{} (claimed {})",
            format!("{}:", deduction.code),
            format_inr(deduction.allowed),
            format_inr(deduction.claimed)
        );
    }
    println!("  Taxable income:     {}", format_inr(result.taxable_income));
    println!();
    println!("  Slab tax:           {}", format_inr(result.slab_tax));
    if !result.rebate.is_zero() {
        println!("  Rebate u/s 87A:    -{}", format_inr(result.rebate));
    }
    println!("  Tax after rebate:   {}", format_inr(result.tax_after_rebate));
    if !result.surcharge.is_zero() || !result.surcharge_relief.is_zero() {
        println!("  Surcharge:          {}", format_inr(result.surcharge));
        if !result.surcharge_relief.is_zero() {
            println!(
                "  (after marginal relief of {})",
                format_inr(result.surcharge_relief)
            );
        }
    }
    println!("  Cess:               {}", format_inr(result.cess));
    println!();
    println!(
        "TOTAL TAX: {} (effective rate {})",
        format_inr(result.total_tax),
        format_pct(result.effective_rate)
    );
    println!();
}
