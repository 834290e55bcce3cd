use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::Product, pricing::CommissionBreakdown};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VariantRequest {
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub price_adjustment: Decimal,
    pub stock: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub variants: Vec<VariantRequest>,
    #[serde(default)]
    pub designs: Vec<DesignPlacement>,
}

/// Puts one of the partner's designs on the product.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DesignPlacement {
    pub design_id: Uuid,
    pub placement: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<Decimal>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantCommission {
    pub variant_id: Uuid,
    pub size: String,
    pub color: String,
    pub breakdown: CommissionBreakdown,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCommission {
    pub product_id: Uuid,
    pub category: String,
    pub base: CommissionBreakdown,
    pub variants: Vec<VariantCommission>,
}
