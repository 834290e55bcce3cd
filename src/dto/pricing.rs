use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pricing::{CategoryRef, CommissionBreakdown, PriceRange, ProductKind};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommissionQuoteRequest {
    pub price: Decimal,
    pub category: CategoryRef,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommissionQuote {
    pub breakdown: CommissionBreakdown,
    /// Display strings rounded to cents.
    pub commission_display: String,
    pub platform_fee_display: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RangeQuery {
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendedRange {
    pub category: String,
    pub kind: ProductKind,
    pub threshold: Decimal,
    pub range: PriceRange,
}
