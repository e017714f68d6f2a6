//! `voltmart-pricing` — subtotal/tax/grand-total arithmetic.
//!
//! Pure and side-effect free; used by order placement and exercised on its
//! own by reporting.

pub mod totals;

pub use totals::{OrderTotals, PricedLine, grand_total, order_totals, sub_total, tax, tax_rate};
