use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Order, OrderItem},
    status::OrderStatus,
};

/// An order as seen by a partner: only the partner's own lines.
#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub commission: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerOrderList {
    pub items: Vec<PartnerOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentOrder {
    pub id: Uuid,
    pub invoice_number: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailySales {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerDashboard {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_sales: Decimal,
    pub total_commission: Decimal,
    pub recent_orders: Vec<RecentOrder>,
    pub recent_sales: Vec<DailySales>,
}
