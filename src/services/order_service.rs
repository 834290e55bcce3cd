use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, record},
    cart::CartEntry,
    dto::orders::{CheckoutRequest, OrderHistory, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        order_status_history::{
            ActiveModel as HistoryActive, Column as HistoryCol, Entity as OrderStatusHistory,
            Model as HistoryModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_variants::{Column as VariantCol, Entity as ProductVariants},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    models::{Order, OrderItem, OrderStatusEntry},
    pricing::{PricedLine, line_commission, round_money, summarize},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service::snapshot, product_service::select_variant},
    state::AppState,
    status::OrderStatus,
};

/// A cart line re-priced against the catalog inside the checkout transaction.
struct CheckoutLine {
    entry: CartEntry,
    category: String,
    partner_id: Option<Uuid>,
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    page_orders(state, condition, query).await
}

/// Every order in the store, for the admin console.
pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_role(user, Role::Admin)?;
    page_orders(state, Condition::all(), query).await
}

async fn page_orders(
    state: &AppState,
    mut condition: Condition,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Turns the caller's cart into a PENDING order.
///
/// Prices and stock are re-read under row locks, so the order reflects the
/// catalog at checkout time rather than when items were added. Only the
/// ordered quantities leave the cart, so items added meanwhile are kept.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let cart = state.carts.get(user.user_id).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let txn = state.orm.begin().await?;

    let mut lines: Vec<CheckoutLine> = Vec::with_capacity(cart.entries.len());
    for entry in &cart.entries {
        let product_id = entry.product.id;
        let product = Products::find_by_id(product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Product {product_id} is no longer available"))
            })?;

        let variants = ProductVariants::find()
            .filter(VariantCol::ProductId.eq(product_id))
            .lock(LockType::Update)
            .all(&txn)
            .await?;
        let variant = select_variant(product_id, variants, entry.product.variant_id)?;
        if let Some(variant) = &variant {
            if i64::from(variant.stock) < i64::from(entry.quantity) {
                return Err(AppError::BadRequest(format!(
                    "Insufficient stock for product {product_id}"
                )));
            }
        }

        lines.push(CheckoutLine {
            entry: CartEntry {
                product: snapshot(&product, variant.as_ref()),
                quantity: entry.quantity,
            },
            category: product.category,
            partner_id: product.partner_id,
        });
    }

    let totals = summarize(lines.iter().map(|line| &line.entry), &state.shipping);

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        subtotal: Set(round_money(totals.subtotal)),
        tax: Set(round_money(totals.tax)),
        shipping: Set(round_money(totals.shipping)),
        total_amount: Set(round_money(totals.total)),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        shipping_address: Set(payload.shipping_address),
        invoice_number: Set(build_invoice_number(order_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in &lines {
        let quantity = i32::try_from(line.entry.quantity)
            .map_err(|_| AppError::BadRequest("Cart has invalid quantity".into()))?;
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.entry.product.id),
            variant_id: Set(line.entry.product.variant_id),
            partner_id: Set(line.partner_id),
            product_name: Set(line.entry.product.name.clone()),
            category: Set(line.category.clone()),
            quantity: Set(quantity),
            unit_price: Set(line.entry.unit_price()),
            commission: Set(round_money(line_commission(&line.entry, &line.category))),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));

        if let Some(variant_id) = line.entry.product.variant_id {
            ProductVariants::update_many()
                .col_expr(VariantCol::Stock, Expr::col(VariantCol::Stock).sub(quantity))
                .filter(VariantCol::Id.eq(variant_id))
                .exec(&txn)
                .await?;
        }
    }

    let first = append_history(
        &txn,
        order.id,
        OrderStatus::Pending,
        Some("Order placed".to_string()),
        Some(user.user_id),
    )
    .await?;

    txn.commit().await?;

    state
        .carts
        .with_cart(user.user_id, |live| live.deduct(&cart.entries))
        .await;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        total = %order.total_amount,
        items = items.len(),
        "checkout completed"
    );
    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "checkout",
            "orders",
            serde_json::json!({ "order_id": order.id, "total": order.total_amount }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
            history: vec![history_from_entity(first)?],
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_order(&state.orm, id).await?;
    let items = items_of(&state.orm, order.id).await?;
    ensure_can_view(user, &order, &items)?;
    let history = history_of(&state.orm, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
            history,
        },
        Some(Meta::empty()),
    ))
}

pub async fn order_history(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderHistory>> {
    let order = find_order(&state.orm, id).await?;
    let items = items_of(&state.orm, order.id).await?;
    ensure_can_view(user, &order, &items)?;

    let history = history_of(&state.orm, order.id).await?;
    let total = history.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        OrderHistory { items: history },
        Some(Meta::new(1, total, total)),
    ))
}

/// Moves an order along its lifecycle. Admins may update any order; partners
/// only orders that contain one of their products.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = items_of(&txn, order.id).await?;

    match user.role {
        Role::Admin => {}
        Role::Partner if contains_partner_items(&items, user.user_id) => {}
        _ => return Err(AppError::Forbidden),
    }

    let current = parse_status(&order.status)?;
    let next = payload.status;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot update order from {current} to {next}"
        )));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    append_history(&txn, order.id, next, payload.notes, Some(user.user_id)).await?;
    let history = history_of(&txn, order.id).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = %current, to = %next, "order status updated");
    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "order_status_update",
            "orders",
            serde_json::json!({ "order_id": order.id, "from": current, "to": next }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Status updated",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
            history,
        },
        Some(Meta::empty()),
    ))
}

fn contains_partner_items(items: &[OrderItem], partner_id: Uuid) -> bool {
    items.iter().any(|item| item.partner_id == Some(partner_id))
}

fn ensure_can_view(user: &AuthUser, order: &OrderModel, items: &[OrderItem]) -> AppResult<()> {
    let allowed = match user.role {
        Role::Admin => true,
        Role::Partner => {
            order.user_id == user.user_id || contains_partner_items(items, user.user_id)
        }
        Role::Client => order.user_id == user.user_id,
    };
    // Hide the existence of other people's orders.
    if allowed { Ok(()) } else { Err(AppError::NotFound) }
}

async fn find_order<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn items_of<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(items)
}

async fn history_of<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> AppResult<Vec<OrderStatusEntry>> {
    OrderStatusHistory::find()
        .filter(HistoryCol::OrderId.eq(order_id))
        .order_by_asc(HistoryCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(history_from_entity)
        .collect()
}

async fn append_history<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    status: OrderStatus,
    notes: Option<String>,
    updated_by: Option<Uuid>,
) -> AppResult<HistoryModel> {
    let entry = HistoryActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        status: Set(status.as_str().to_string()),
        notes: Set(notes),
        updated_by: Set(updated_by),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(entry)
}

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(err.into()))
}

pub(crate) fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        subtotal: model.subtotal,
        tax: model.tax,
        shipping: model.shipping,
        total_amount: model.total_amount,
        status: parse_status(&model.status)?,
        shipping_address: model.shipping_address,
        invoice_number: model.invoice_number,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        variant_id: model.variant_id,
        partner_id: model.partner_id,
        product_name: model.product_name,
        category: model.category,
        quantity: model.quantity,
        unit_price: model.unit_price,
        line_total: model.unit_price * Decimal::from(model.quantity),
        commission: model.commission,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn history_from_entity(model: HistoryModel) -> AppResult<OrderStatusEntry> {
    Ok(OrderStatusEntry {
        id: model.id,
        order_id: model.order_id,
        status: parse_status(&model.status)?,
        notes: model.notes,
        updated_by: model.updated_by,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8]).to_uppercase()
}
