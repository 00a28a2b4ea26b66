use super::config::RebateRule;
use rust_decimal::Decimal;

/// Section 87A rebate on `slab_tax` for a taxpayer with `income`.
///
/// The fixed rule is a hard cliff: one rupee over the limit forfeits the
/// whole rebate. The marginal rule tapers instead, so tax above the limit
/// never exceeds the income above it.
pub fn rebate(slab_tax: Decimal, income: Decimal, rule: &RebateRule) -> Decimal {
    let rebate = match *rule {
        RebateRule::Fixed {
            income_limit,
            amount,
        } => {
            if income <= income_limit {
                slab_tax.min(amount)
            } else {
                Decimal::ZERO
            }
        }
        RebateRule::Marginal { income_limit } => {
            if income <= income_limit {
                slab_tax
            } else {
                let excess = income - income_limit;
                if slab_tax > excess {
                    slab_tax - excess
                } else {
                    Decimal::ZERO
                }
            }
        }
    };
    rebate.max(Decimal::ZERO)
}

/// Tax left once the rebate has been taken off
pub fn tax_after_rebate(slab_tax: Decimal, income: Decimal, rule: &RebateRule) -> Decimal {
    (slab_tax - rebate(slab_tax, income, rule)).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fixed() -> RebateRule {
        RebateRule::Fixed {
            income_limit: dec!(500000),
            amount: dec!(12500),
        }
    }

    fn marginal() -> RebateRule {
        RebateRule::Marginal {
            income_limit: dec!(1200000),
        }
    }

    #[test]
    fn fixed_rebate_at_limit() {
        assert_eq!(rebate(dec!(12500), dec!(500000), &fixed()), dec!(12500));
        assert_eq!(tax_after_rebate(dec!(12500), dec!(500000), &fixed()), dec!(0));
    }

    #[test]
    fn fixed_rebate_capped_at_amount() {
        // The rebate never exceeds the configured amount
        assert_eq!(rebate(dec!(15000), dec!(450000), &fixed()), dec!(12500));
        assert_eq!(rebate(dec!(5000), dec!(350000), &fixed()), dec!(5000));
    }

    #[test]
    fn fixed_rebate_cliff() {
        assert_eq!(rebate(dec!(12500.05), dec!(500001), &fixed()), dec!(0));
        assert_eq!(
            tax_after_rebate(dec!(12500.05), dec!(500001), &fixed()),
            dec!(12500.05)
        );
    }

    #[test]
    fn marginal_rebate_full_within_limit() {
        assert_eq!(rebate(dec!(60000), dec!(1200000), &marginal()), dec!(60000));
        assert_eq!(tax_after_rebate(dec!(32500), dec!(925000), &marginal()), dec!(0));
    }

    #[test]
    fn marginal_relief_just_above_limit() {
        // Slab tax at 1,200,100 is 60,015; only the 100 over the limit is payable
        assert_eq!(rebate(dec!(60015), dec!(1200100), &marginal()), dec!(59915));
        assert_eq!(
            tax_after_rebate(dec!(60015), dec!(1200100), &marginal()),
            dec!(100)
        );
    }

    #[test]
    fn marginal_relief_ends_when_natural_tax_is_lower() {
        // At 1,300,000 slab tax is 75,000 but the excess is 100,000
        assert_eq!(rebate(dec!(75000), dec!(1300000), &marginal()), dec!(0));
        assert_eq!(
            tax_after_rebate(dec!(75000), dec!(1300000), &marginal()),
            dec!(75000)
        );
    }
}
