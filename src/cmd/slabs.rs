//! Slabs command - show the rates configured for an assessment year

use super::select_year;
use clap::Args;
use itax::money::{format_inr, format_pct};
use itax::tax::config::{Bracket, RebateRule, RegimeConfig, SurchargePolicy, UpperBound};
use itax::tax::{AssessmentYear, TaxTable};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SlabsCommand {
    /// Assessment year (e.g. 2027 or 2026-27). Defaults to the current one.
    #[arg(short, long)]
    year: Option<AssessmentYear>,

    /// Output the year's configuration as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct BracketRow {
    #[tabled(rename = "Taxable income")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl SlabsCommand {
    pub fn exec(&self, table: &TaxTable) -> anyhow::Result<()> {
        let config = select_year(table, self.year)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(config)?);
            return Ok(());
        }

        println!();
        println!(
            "AY {} (income earned in FY {})",
            config.assessment_year,
            config.assessment_year.financial_year()
        );
        for rules in [&config.old, &config.new] {
            print_regime(rules);
        }
        println!("Health and education cess: {}", format_pct(config.cess_rate));
        println!("Table fingerprint: {}", table.fingerprint()?);
        println!();
        Ok(())
    }
}

fn print_regime(rules: &RegimeConfig) {
    println!();
    println!("{} REGIME", rules.regime.display().to_uppercase());

    let mut table = Table::new(bracket_rows(&rules.brackets));
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    println!("{}", table);

    for (age, floor) in &rules.age_exemptions {
        println!("  Exemption ({}): {}", age, format_inr(*floor));
    }

    match rules.rebate {
        RebateRule::Fixed {
            income_limit,
            amount,
        } => println!(
            "  Rebate u/s 87A: up to {} if taxable income <= {}",
            format_inr(amount),
            format_inr(income_limit)
        ),
        RebateRule::Marginal { income_limit } => println!(
            "  Rebate u/s 87A: full up to {}, marginal relief above",
            format_inr(income_limit)
        ),
    }

    let slabs: Vec<String> = rules
        .surcharge
        .slabs
        .iter()
        .map(|s| format!("{} above {}", format_pct(s.rate), format_inr(s.min_income)))
        .collect();
    println!("  Surcharge: {}", slabs.join(", "));
    match rules.surcharge.policy {
        SurchargePolicy::Override { threshold, rate } => println!(
            "  Surcharge: {} above {}",
            format_pct(rate),
            format_inr(threshold)
        ),
        SurchargePolicy::Cap { max_rate } => {
            println!("  Surcharge capped at {}", format_pct(max_rate))
        }
    }

    let caps: Vec<String> = rules
        .deduction_caps
        .iter()
        .map(|(code, cap)| format!("{} {}", code, format_inr(*cap)))
        .collect();
    println!("  Deductions: {}", caps.join(", "));
    println!();
}

fn bracket_rows(brackets: &[Bracket]) -> Vec<BracketRow> {
    let mut lower = Decimal::ZERO;
    brackets
        .iter()
        .map(|bracket| {
            let range = match bracket.upper_bound {
                UpperBound::Bounded(upper) => {
                    let range = format!("{} - {}", format_inr(lower), format_inr(upper));
                    lower = upper;
                    range
                }
                UpperBound::Unbounded => format!("above {}", format_inr(lower)),
            };
            BracketRow {
                range,
                rate: format_pct(bracket.rate),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itax::tax::BUILTIN;

    #[test]
    fn bracket_rows_chain_lower_edges() {
        let config = BUILTIN.year(AssessmentYear(2027)).unwrap();
        let rows = bracket_rows(&config.old.brackets);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].range, "₹0.00 - ₹2,50,000.00");
        assert_eq!(rows[1].rate, "5%");
        assert_eq!(rows[3].range, "above ₹10,00,000.00");
        assert_eq!(rows[3].rate, "30%");
    }
}
