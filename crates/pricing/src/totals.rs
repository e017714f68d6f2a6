//! Order pricing arithmetic.
//!
//! Pure functions over `rust_decimal::Decimal` so money never touches binary
//! floating point. The tax rate is a single flat 10%; tax is rounded to two
//! decimal places with round-half-to-even (banker's rounding), and the grand
//! total is an exact sum with no further rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Flat tax rate applied to every order (10%).
pub fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Price and quantity of one order line, as pricing sees it.
///
/// Quantity validation (positive, non-zero) belongs to order placement, not
/// here: a zero-quantity or zero-price line simply contributes zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl PricedLine {
    pub fn new(unit_price: Decimal, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// `unit_price × quantity`, exact.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Computed totals for an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub sub_total: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

/// Sum of `unit_price × quantity` over all lines. Empty input yields zero.
pub fn sub_total(lines: &[PricedLine]) -> Decimal {
    lines.iter().map(PricedLine::line_total).sum()
}

/// 10% of the subtotal, rounded to 2dp with round-half-to-even.
pub fn tax(sub_total: Decimal) -> Decimal {
    (sub_total * tax_rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Exact sum of subtotal and tax; no further rounding.
pub fn grand_total(sub_total: Decimal, tax: Decimal) -> Decimal {
    sub_total + tax
}

/// Compute all three totals for a set of lines in one pass.
pub fn order_totals(lines: &[PricedLine]) -> OrderTotals {
    let sub = sub_total(lines);
    let tax = tax(sub);
    OrderTotals {
        sub_total: sub,
        tax,
        grand_total: grand_total(sub, tax),
    }
}
