use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartEntry, CartProduct},
    pricing::{CartTotals, PricedLine, ShippingPolicy},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

/// Selects one cart entry of a product; omit for products without variants.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CartItemQuery {
    pub variant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartEntry> for CartLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product: entry.product.clone(),
            quantity: entry.quantity,
            unit_price: entry.unit_price(),
            line_total: entry.line_total(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub is_open: bool,
    pub totals: CartTotals,
}

impl CartView {
    pub fn new(cart: &Cart, policy: &ShippingPolicy) -> Self {
        Self {
            items: cart.entries.iter().map(CartLine::from).collect(),
            is_open: cart.is_open,
            totals: cart.totals(policy),
        }
    }
}
