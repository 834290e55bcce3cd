use chrono::{NaiveDate, Utc};
use creative_print_api::{
    models::{Order, OrderItem},
    pricing::{calculate_commission, round_money},
    services::partner_service::{daily_sales, partner_order, summarize_dashboard},
    status::OrderStatus,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn order(status: OrderStatus, day: NaiveDate) -> Order {
    let created_at = day.and_hms_opt(12, 0, 0).unwrap().and_utc();
    Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        subtotal: Decimal::ZERO,
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        total_amount: Decimal::new(100, 0),
        status,
        shipping_address: None,
        invoice_number: format!("INV-{}", Uuid::new_v4().simple()),
        created_at,
        updated_at: created_at,
    }
}

fn item(order: &Order, category: &str, unit_price: Decimal, quantity: i32) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        product_id: Uuid::new_v4(),
        variant_id: None,
        partner_id: Some(Uuid::new_v4()),
        product_name: category.to_string(),
        category: category.to_string(),
        quantity,
        unit_price,
        line_total: unit_price * Decimal::from(quantity),
        commission: round_money(
            calculate_commission(unit_price, category).commission * Decimal::from(quantity),
        ),
        created_at: Utc::now(),
    }
}

#[test]
fn daily_sales_cover_last_seven_days() {
    let today = date(2024, 5, 10);
    let days = daily_sales(
        today,
        [
            (date(2024, 5, 10), Decimal::new(10, 0)),
            (date(2024, 5, 4), Decimal::new(5, 0)),
            (date(2024, 5, 3), Decimal::new(99, 0)),
            (date(2024, 5, 10), Decimal::new(25, 1)),
        ],
    );

    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, date(2024, 5, 4));
    assert_eq!(days[0].amount, Decimal::new(5, 0));
    assert_eq!(days[6].date, today);
    assert_eq!(days[6].amount, Decimal::new(125, 1));
    assert!(days[1..6].iter().all(|d| d.amount.is_zero()));
}

#[test]
fn partner_order_sums_rounded_line_commission() {
    let o = order(OrderStatus::Pending, date(2024, 5, 10));
    let items = vec![
        item(&o, "T-Shirts", Decimal::new(2499, 2), 1),
        item(&o, "T-Shirts", Decimal::new(2499, 2), 1),
    ];

    let po = partner_order(o, items);
    assert_eq!(po.commission, Decimal::new(1538, 2));
}

#[test]
fn partner_order_uses_commission_stored_on_lines() {
    let o = order(OrderStatus::Pending, date(2024, 5, 10));
    let mut first = item(&o, "T-Shirts", Decimal::new(2499, 2), 1);
    first.commission = Decimal::new(123, 2);
    let mut second = item(&o, "Mugs", Decimal::new(10, 0), 3);
    second.commission = Decimal::new(50, 2);

    let po = partner_order(o, vec![first, second]);
    assert_eq!(po.commission, Decimal::new(173, 2));
}

#[test]
fn dashboard_counts_only_paid_orders() {
    let today = Utc::now().date_naive();

    let paid = order(OrderStatus::PaymentReceived, today);
    let paid_items = vec![item(&paid, "T-Shirts", Decimal::new(2499, 2), 2)];
    let pending = order(OrderStatus::Pending, today);
    let pending_items = vec![item(&pending, "Mugs", Decimal::new(10, 0), 1)];
    let delivered = order(OrderStatus::Delivered, today);
    let delivered_items = vec![item(&delivered, "Hats", Decimal::new(14, 0), 1)];

    let orders = vec![
        partner_order(paid, paid_items),
        partner_order(pending, pending_items),
        partner_order(delivered, delivered_items),
    ];
    let dashboard = summarize_dashboard(4, &orders, today);

    assert_eq!(dashboard.total_products, 4);
    assert_eq!(dashboard.total_orders, 3);
    assert_eq!(dashboard.total_sales, Decimal::new(6398, 2));
    // 15.39 (2 shirts) + 4.20 (hat)
    assert_eq!(dashboard.total_commission, Decimal::new(1959, 2));
    assert_eq!(dashboard.recent_orders.len(), 3);
    assert_eq!(dashboard.recent_sales.len(), 7);
    assert_eq!(
        dashboard.recent_sales.last().map(|d| d.amount),
        Some(Decimal::new(6398, 2))
    );
}

#[test]
fn recent_orders_are_capped_at_five() {
    let today = date(2024, 5, 10);
    let orders: Vec<_> = (0..8)
        .map(|_| {
            let o = order(OrderStatus::Shipped, today);
            let items = vec![item(&o, "Mugs", Decimal::new(12, 0), 1)];
            partner_order(o, items)
        })
        .collect();

    let dashboard = summarize_dashboard(1, &orders, today);
    assert_eq!(dashboard.total_orders, 8);
    assert_eq!(dashboard.recent_orders.len(), 5);
    assert_eq!(dashboard.recent_orders[0].id, orders[0].order.id);
}
