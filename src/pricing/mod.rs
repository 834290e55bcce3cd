//! Shared pricing rules.
//!
//! Every surface that shows money (cart, checkout, order details, partner
//! dashboard) goes through this module so that they all agree.

pub mod commission;
pub mod totals;

pub use commission::{
    COMMISSION_RATE, CategoryRef, CommissionBreakdown, PriceRange, ProductKind,
    calculate_commission, category_threshold, recommended_price_range,
};
pub use totals::{
    CartTotals, PricedLine, ShippingPolicy, TAX_RATE, format_currency, line_commission,
    order_commission, round_money, summarize,
};
