use rust_decimal::Decimal;

/// Health and education cess on tax plus surcharge. Flat, no relief.
pub fn cess(tax_and_surcharge: Decimal, rate: Decimal) -> Decimal {
    (tax_and_surcharge * rate).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn four_percent_cess() {
        assert_eq!(cess(dec!(32500), dec!(0.04)), dec!(1300));
        assert_eq!(cess(dec!(0), dec!(0.04)), dec!(0));
    }

    #[test]
    fn cess_rounds_to_paise() {
        assert_eq!(cess(dec!(100.33), dec!(0.04)), dec!(4.01));
    }
}
