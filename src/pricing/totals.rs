use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::commission::calculate_commission;

pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Anything that contributes `unit_price * quantity` to a subtotal.
pub trait PricedLine {
    fn unit_price(&self) -> Decimal;
    fn quantity(&self) -> u32;

    fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free. `None` always charges the fee.
    pub free_over: Option<Decimal>,
    pub flat_fee: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_over: Some(Decimal::new(100, 0)),
            flat_fee: Decimal::new(15, 0),
        }
    }
}

impl ShippingPolicy {
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match self.free_over {
            Some(threshold) if subtotal > threshold => Decimal::ZERO,
            _ => self.flat_fee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

pub fn summarize<'a, L, I>(lines: I, policy: &ShippingPolicy) -> CartTotals
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let (item_count, subtotal) = lines
        .into_iter()
        .fold((0u32, Decimal::ZERO), |(count, sum), line| {
            (count.saturating_add(line.quantity()), sum + line.line_total())
        });
    let tax = subtotal * TAX_RATE;
    let shipping = policy.shipping_for(subtotal);

    CartTotals {
        item_count,
        subtotal,
        tax,
        shipping,
        total: subtotal + tax + shipping,
    }
}

/// Partner commission for a whole line, unrounded.
pub fn line_commission<L: PricedLine>(line: &L, category: &str) -> Decimal {
    calculate_commission(line.unit_price(), category).commission * Decimal::from(line.quantity())
}

/// Total partner commission over `(line, category)` pairs. Each line is
/// rounded to cents before summing so the result matches stored order lines.
pub fn order_commission<'a, L, I>(lines: I) -> Decimal
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = (&'a L, &'a str)>,
{
    lines
        .into_iter()
        .map(|(line, category)| round_money(line_commission(line, category)))
        .sum()
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_currency(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
