//! Indian income tax liability under the old and new regimes.
//!
//! Rates come from a [`tax::TaxTable`] loaded once and shared read-only;
//! every computation is a pure function of that table and a [`tax::TaxInput`].

pub mod money;
pub mod tax;
