use super::config::SurchargeSlab;
use super::error::ValidationError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Surcharge band an income falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurchargeBand {
    /// Income at which this band starts
    pub min_income: Decimal,
    pub rate: Decimal,
    /// Rate payable by someone earning exactly `min_income`, i.e. the rate
    /// of the band below (zero below the first slab)
    pub rate_below: Decimal,
}

/// Surcharge with the marginal relief that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SurchargeOutcome {
    pub rate: Decimal,
    /// Surcharge before relief
    pub full: Decimal,
    pub relief: Decimal,
    pub surcharge: Decimal,
}

/// Highest slab whose `min_income` has been reached
pub fn locate_band(slabs: &[SurchargeSlab], income: Decimal) -> Option<SurchargeBand> {
    let index = slabs.iter().rposition(|s| s.min_income <= income)?;
    Some(SurchargeBand {
        min_income: slabs[index].min_income,
        rate: slabs[index].rate,
        rate_below: index
            .checked_sub(1)
            .map_or(Decimal::ZERO, |below| slabs[below].rate),
    })
}

/// Band lookup where a fixed higher rate takes over at `threshold`, above
/// the top slab
pub fn band_with_override(
    slabs: &[SurchargeSlab],
    threshold: Decimal,
    rate: Decimal,
    income: Decimal,
) -> Option<SurchargeBand> {
    if income < threshold {
        return locate_band(slabs, income);
    }
    Some(SurchargeBand {
        min_income: threshold,
        rate,
        rate_below: slabs.last().map_or(Decimal::ZERO, |s| s.rate),
    })
}

/// Band lookup where no slab may charge more than `max_rate`
pub fn band_with_cap(
    slabs: &[SurchargeSlab],
    max_rate: Decimal,
    income: Decimal,
) -> Option<SurchargeBand> {
    locate_band(slabs, income).map(|band| SurchargeBand {
        rate: band.rate.min(max_rate),
        rate_below: band.rate_below.min(max_rate),
        ..band
    })
}

/// Surcharge on `tax_after_rebate` for `income` in `band`.
///
/// `tax_at` gives tax-after-rebate at an arbitrary income and is evaluated
/// at the band's threshold. Relief ensures that tax plus surcharge exceeds
/// the amount payable at the threshold by no more than the income above it.
pub fn surcharge(
    tax_after_rebate: Decimal,
    income: Decimal,
    band: Option<SurchargeBand>,
    tax_at: impl Fn(Decimal) -> Result<Decimal, ValidationError>,
) -> Result<SurchargeOutcome, ValidationError> {
    let Some(band) = band else {
        return Ok(SurchargeOutcome::default());
    };

    let full = (tax_after_rebate * band.rate).round_dp(2);
    let threshold_tax = tax_at(band.min_income)?;
    let payable_at_threshold = threshold_tax + (threshold_tax * band.rate_below).round_dp(2);
    let relief = (tax_after_rebate + full - payable_at_threshold - (income - band.min_income))
        .max(Decimal::ZERO)
        .min(full);

    log::debug!(
        "Surcharge band from {} at {}: full={}, at threshold={}, relief={}",
        band.min_income,
        band.rate,
        full,
        payable_at_threshold,
        relief
    );

    Ok(SurchargeOutcome {
        rate: band.rate,
        full,
        relief,
        surcharge: full - relief,
    })
}
