use super::config::{Bracket, UpperBound};
use super::error::ValidationError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Portion of income that fell into one bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BracketShare {
    pub lower: Decimal,
    /// `None` for the unbounded top bracket
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// Split `income` across the brackets. Income at or below `exemption_floor`
/// is not taxed; brackets lying wholly below the floor yield nothing.
pub fn slab_breakdown(
    income: Decimal,
    brackets: &[Bracket],
    exemption_floor: Option<Decimal>,
) -> Result<Vec<BracketShare>, ValidationError> {
    if income < Decimal::ZERO {
        return Err(ValidationError::NegativeTaxableIncome(income));
    }
    let floor = exemption_floor.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);

    let mut shares = Vec::with_capacity(brackets.len());
    let mut previous_upper = Decimal::ZERO;
    for bracket in brackets {
        let lower = previous_upper.max(floor);
        let (upper, top) = match bracket.upper_bound {
            UpperBound::Bounded(upper) => (Some(upper), income.min(upper)),
            UpperBound::Unbounded => (None, income),
        };
        let taxed_amount = (top - lower).max(Decimal::ZERO);
        shares.push(BracketShare {
            lower,
            upper,
            rate: bracket.rate,
            taxed_amount,
            tax: taxed_amount * bracket.rate,
        });

        match upper {
            Some(upper) if income > upper => previous_upper = upper,
            _ => break,
        }
    }
    Ok(shares)
}

/// Progressive tax on `income`, rounded to paise
pub fn slab_tax(
    income: Decimal,
    brackets: &[Bracket],
    exemption_floor: Option<Decimal>,
) -> Result<Decimal, ValidationError> {
    let shares = slab_breakdown(income, brackets, exemption_floor)?;
    let tax: Decimal = shares.iter().map(|s| s.tax).sum();
    Ok(tax.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn old_brackets() -> Vec<Bracket> {
        vec![
            Bracket::upto(dec!(250000), dec!(0)),
            Bracket::upto(dec!(500000), dec!(0.05)),
            Bracket::upto(dec!(1000000), dec!(0.20)),
            Bracket::above(dec!(0.30)),
        ]
    }

    fn new_brackets() -> Vec<Bracket> {
        vec![
            Bracket::upto(dec!(400000), dec!(0)),
            Bracket::upto(dec!(800000), dec!(0.05)),
            Bracket::upto(dec!(1200000), dec!(0.10)),
            Bracket::upto(dec!(1600000), dec!(0.15)),
            Bracket::upto(dec!(2000000), dec!(0.20)),
            Bracket::upto(dec!(2400000), dec!(0.25)),
            Bracket::above(dec!(0.30)),
        ]
    }

    #[test]
    fn zero_income_no_tax() {
        assert_eq!(slab_tax(dec!(0), &old_brackets(), None), Ok(dec!(0)));
    }

    #[test]
    fn income_in_zero_rate_bracket() {
        assert_eq!(slab_tax(dec!(250000), &old_brackets(), None), Ok(dec!(0)));
        assert_eq!(slab_tax(dec!(400000), &new_brackets(), None), Ok(dec!(0)));
    }

    #[test]
    fn old_regime_six_lakh() {
        // 0 + 12,500 (250k-500k @ 5%) + 20,000 (500k-600k @ 20%)
        assert_eq!(
            slab_tax(dec!(600000), &old_brackets(), None),
            Ok(dec!(32500))
        );
    }

    #[test]
    fn new_regime_nine_lakh_twenty_five() {
        // 0 + 20,000 (400k-800k @ 5%) + 12,500 (800k-925k @ 10%)
        assert_eq!(
            slab_tax(dec!(925000), &new_brackets(), None),
            Ok(dec!(32500))
        );
    }

    #[test]
    fn unbounded_bracket_takes_remainder() {
        // 12,500 + 100,000 + 30% of 1,000,000
        assert_eq!(
            slab_tax(dec!(2000000), &old_brackets(), None),
            Ok(dec!(412500))
        );
    }

    #[test]
    fn continuous_at_upper_bounds() {
        let brackets = new_brackets();
        for bound in [400000, 800000, 1200000, 1600000, 2000000, 2400000] {
            let bound = Decimal::from(bound);
            let at = slab_tax(bound, &brackets, None).unwrap();
            let after = slab_tax(bound + dec!(0.01), &brackets, None).unwrap();
            assert!(after - at <= dec!(0.01), "jump at {}: {} -> {}", bound, at, after);
            assert!(after >= at);
        }
    }

    #[test]
    fn senior_exemption_floor_raises_first_edge() {
        // 60-80: nothing below 300k, then 5% to 500k, 20% to 600k
        assert_eq!(
            slab_tax(dec!(600000), &old_brackets(), Some(dec!(300000))),
            Ok(dec!(30000))
        );
        assert_eq!(
            slab_tax(dec!(300000), &old_brackets(), Some(dec!(300000))),
            Ok(dec!(0))
        );
    }

    #[test]
    fn super_senior_floor_skips_whole_bracket() {
        // Above 80: the 5% bracket disappears entirely
        assert_eq!(
            slab_tax(dec!(500000), &old_brackets(), Some(dec!(500000))),
            Ok(dec!(0))
        );
        assert_eq!(
            slab_tax(dec!(600000), &old_brackets(), Some(dec!(500000))),
            Ok(dec!(20000))
        );
    }

    #[test]
    fn breakdown_lists_touched_brackets() {
        let shares = slab_breakdown(dec!(600000), &old_brackets(), None).unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[1].taxed_amount, dec!(250000));
        assert_eq!(shares[2].lower, dec!(500000));
        assert_eq!(shares[2].upper, Some(dec!(1000000)));
        assert_eq!(shares[2].taxed_amount, dec!(100000));
        assert_eq!(shares[2].tax, dec!(20000));

        let shares = slab_breakdown(dec!(1500000), &old_brackets(), None).unwrap();
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[3].upper, None);
        assert_eq!(shares[3].taxed_amount, dec!(500000));
    }

    #[test]
    fn fractional_income_rounds_to_paise() {
        assert_eq!(
            slab_tax(dec!(250000.33), &old_brackets(), None),
            Ok(dec!(0.02))
        );
    }

    #[test]
    fn negative_income_rejected() {
        assert_eq!(
            slab_tax(dec!(-1), &old_brackets(), None),
            Err(ValidationError::NegativeTaxableIncome(dec!(-1)))
        );
    }
}
