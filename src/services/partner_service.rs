use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::partner::{DailySales, PartnerDashboard, PartnerOrder, PartnerOrderList, RecentOrder},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
        products::{Column as ProductCol, Entity as Products},
    },
    error::AppResult,
    middleware::auth::{AuthUser, Role, ensure_role},
    models::{Order, OrderItem},
    pricing::PricedLine,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::order_service::{order_from_entity, order_item_from_entity},
    state::AppState,
};

const RECENT_ORDERS: usize = 5;
const SALES_WINDOW_DAYS: i64 = 7;

/// Orders containing at least one of the partner's products, newest first.
pub async fn list_partner_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PartnerOrderList>> {
    ensure_role(user, Role::Partner)?;
    let (page, limit, offset) = pagination.normalize();

    let mut by_order = partner_items(state, user.user_id).await?;
    let order_ids: Vec<Uuid> = by_order.keys().copied().collect();

    let finder = Orders::find()
        .filter(OrderCol::Id.is_in(order_ids))
        .order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(orders.len());
    for model in orders {
        let order = order_from_entity(model)?;
        let lines = by_order.remove(&order.id).unwrap_or_default();
        items.push(partner_order(order, lines));
    }

    Ok(ApiResponse::success(
        "OK",
        PartnerOrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PartnerDashboard>> {
    ensure_role(user, Role::Partner)?;

    let total_products = Products::find()
        .filter(ProductCol::PartnerId.eq(user.user_id))
        .count(&state.orm)
        .await? as i64;

    let mut by_order = partner_items(state, user.user_id).await?;
    let order_ids: Vec<Uuid> = by_order.keys().copied().collect();
    let orders = Orders::find()
        .filter(OrderCol::Id.is_in(order_ids))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let partner_orders: Vec<PartnerOrder> = orders
        .into_iter()
        .map(|order| {
            let lines = by_order.remove(&order.id).unwrap_or_default();
            partner_order(order, lines)
        })
        .collect();

    let data = summarize_dashboard(total_products, &partner_orders, Utc::now().date_naive());
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

/// Dashboard figures over the partner's orders, sorted newest first.
///
/// Sales and commission only count orders whose status counts as a sale, and
/// only the partner's own lines within them.
pub fn summarize_dashboard(
    total_products: i64,
    orders: &[PartnerOrder],
    today: NaiveDate,
) -> PartnerDashboard {
    let sales: Vec<&PartnerOrder> = orders
        .iter()
        .filter(|po| po.order.status.counts_as_sale())
        .collect();

    let total_sales = sales.iter().map(|po| partner_sales(&po.items)).sum();
    let total_commission = sales.iter().map(|po| po.commission).sum();

    let recent_orders = orders
        .iter()
        .take(RECENT_ORDERS)
        .map(|po| RecentOrder {
            id: po.order.id,
            invoice_number: po.order.invoice_number.clone(),
            total: po.order.total_amount,
            status: po.order.status,
            created_at: po.order.created_at,
        })
        .collect();

    let recent_sales = daily_sales(
        today,
        sales
            .iter()
            .map(|po| (po.order.created_at.date_naive(), partner_sales(&po.items))),
    );

    PartnerDashboard {
        total_products,
        total_orders: orders.len() as i64,
        total_sales,
        total_commission,
        recent_orders,
        recent_sales,
    }
}

/// One entry per day for the last seven days ending `today`, oldest first.
/// Sales outside the window are ignored.
pub fn daily_sales<I>(today: NaiveDate, sales: I) -> Vec<DailySales>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let start = today - Duration::days(SALES_WINDOW_DAYS - 1);
    let mut days: BTreeMap<NaiveDate, Decimal> = (0..SALES_WINDOW_DAYS)
        .map(|offset| (start + Duration::days(offset), Decimal::ZERO))
        .collect();

    for (date, amount) in sales {
        if let Some(total) = days.get_mut(&date) {
            *total += amount;
        }
    }

    days.into_iter()
        .map(|(date, amount)| DailySales { date, amount })
        .collect()
}

/// Commission is the sum of the amounts stored on each line at checkout.
pub fn partner_order(order: Order, items: Vec<OrderItem>) -> PartnerOrder {
    let commission = items.iter().map(|item| item.commission).sum();
    PartnerOrder {
        order,
        items,
        commission,
    }
}

fn partner_sales(items: &[OrderItem]) -> Decimal {
    items.iter().map(PricedLine::line_total).sum()
}

async fn partner_items(
    state: &AppState,
    partner_id: Uuid,
) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::PartnerId.eq(partner_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order
            .entry(item.order_id)
            .or_default()
            .push(order_item_from_entity(item));
    }
    Ok(by_order)
}
