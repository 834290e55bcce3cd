use creative_print_api::pricing::{
    COMMISSION_RATE, CategoryRef, PricedLine, ProductKind, ShippingPolicy, calculate_commission,
    category_threshold, format_currency, line_commission, order_commission,
    recommended_price_range, round_money, summarize,
};
use rust_decimal::Decimal;

struct Line {
    price: Decimal,
    qty: u32,
}

impl PricedLine for Line {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.qty
    }
}

fn dec(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

fn line(price: Decimal, qty: u32) -> Line {
    Line { price, qty }
}

#[test]
fn shirt_commission_is_seventy_percent_above_threshold() {
    let breakdown = calculate_commission(dec(2499, 2), "T-Shirts");

    assert_eq!(breakdown.kind, ProductKind::Shirt);
    assert_eq!(breakdown.threshold, dec(14, 0));
    assert_eq!(breakdown.commission_rate, COMMISSION_RATE);
    assert_eq!(breakdown.commissionable_amount, dec(1099, 2));
    assert_eq!(breakdown.commission, dec(7693, 3));
    assert_eq!(breakdown.platform_fee, dec(17297, 3));
    assert_eq!(format_currency(breakdown.commission), "7.69");
}

#[test]
fn commission_and_fee_add_up_to_price() {
    for (price, category) in [
        (dec(2999, 2), "Premium Shirt"),
        (dec(1450, 2), "Snapback Cap"),
        (dec(1299, 2), "Mugs"),
        (dec(500, 2), "Stickers"),
        (dec(1000, 2), "T-Shirt"),
    ] {
        let breakdown = calculate_commission(price, category);
        assert_eq!(breakdown.commission + breakdown.platform_fee, price, "{category}");
    }
}

#[test]
fn hats_and_caps_share_a_threshold() {
    let hat = calculate_commission(dec(14, 0), "Hats");
    let cap = calculate_commission(dec(14, 0), "Baseball CAP");

    assert_eq!(hat.kind, ProductKind::Hat);
    assert_eq!(cap.kind, ProductKind::Hat);
    assert_eq!(hat.commission, dec(42, 1));
    assert_eq!(cap.commission, hat.commission);
}

#[test]
fn mug_commission() {
    let breakdown = calculate_commission(dec(10, 0), "Coffee Mug");
    assert_eq!(breakdown.kind, ProductKind::Mug);
    assert_eq!(breakdown.commission, dec(21, 1));
}

#[test]
fn unknown_category_commissions_the_whole_price() {
    assert_eq!(category_threshold("Posters"), Decimal::ZERO);
    assert_eq!(category_threshold(""), Decimal::ZERO);

    let breakdown = calculate_commission(dec(1299, 2), "Posters");
    assert_eq!(breakdown.kind, ProductKind::Other);
    assert_eq!(breakdown.commission, dec(9093, 3));
}

#[test]
fn price_below_threshold_earns_nothing() {
    let breakdown = calculate_commission(dec(10, 0), "t-shirt");

    assert_eq!(breakdown.commissionable_amount, Decimal::ZERO);
    assert_eq!(breakdown.commission, Decimal::ZERO);
    assert_eq!(breakdown.platform_fee, dec(10, 0));
}

#[test]
fn shirt_wins_over_later_matches() {
    assert_eq!(ProductKind::from_category("Shirt & Cap Bundle"), ProductKind::Shirt);
    assert_eq!(ProductKind::from_category("Cap and Mug"), ProductKind::Hat);
}

#[test]
fn recommended_ranges_per_kind() {
    let mugs = recommended_price_range("Mugs");
    assert_eq!(mugs.min, dec(1299, 2));
    assert_eq!(mugs.max, dec(1999, 2));

    let shirts = recommended_price_range("Long Sleeve Shirt");
    assert_eq!(shirts.min, dec(1999, 2));
    assert_eq!(shirts.max, dec(2999, 2));

    let other = recommended_price_range("Tote Bags");
    assert_eq!(other.min, dec(999, 2));
    assert_eq!(other.max, dec(2999, 2));
}

#[test]
fn category_accepts_label_or_object() {
    let label: CategoryRef = serde_json::from_str("\"Mugs\"").unwrap();
    assert_eq!(label, CategoryRef::from("Mugs"));
    assert_eq!(label.kind(), ProductKind::Mug);

    let detailed: CategoryRef =
        serde_json::from_str(r#"{"name":"T-Shirts","description":"Cotton tees"}"#).unwrap();
    assert_eq!(detailed.label(), "T-Shirts");
    assert_eq!(detailed.kind(), ProductKind::Shirt);
}

#[test]
fn summarize_charges_tax_and_flat_shipping() {
    let lines = vec![line(dec(10, 0), 2), line(dec(5, 0), 1)];
    let totals = summarize(&lines, &ShippingPolicy::default());

    assert_eq!(totals.item_count, 3);
    assert_eq!(totals.subtotal, dec(25, 0));
    assert_eq!(totals.tax, dec(250, 2));
    assert_eq!(totals.shipping, dec(15, 0));
    assert_eq!(totals.total, dec(4250, 2));
}

#[test]
fn shipping_is_free_only_above_threshold() {
    let policy = ShippingPolicy::default();

    let above = summarize(&vec![line(dec(60, 0), 2)], &policy);
    assert_eq!(above.shipping, Decimal::ZERO);
    assert_eq!(above.total, dec(132, 0));

    let exactly = summarize(&vec![line(dec(100, 0), 1)], &policy);
    assert_eq!(exactly.shipping, dec(15, 0));
    assert_eq!(exactly.total, dec(125, 0));
}

#[test]
fn empty_cart_has_zero_totals() {
    let lines: Vec<Line> = Vec::new();
    let totals = summarize(&lines, &ShippingPolicy::default());

    assert_eq!(totals.item_count, 0);
    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::ZERO);
}

#[test]
fn policy_without_free_threshold_always_charges() {
    let policy = ShippingPolicy {
        free_over: None,
        flat_fee: dec(999, 2),
    };
    assert_eq!(policy.shipping_for(dec(500, 0)), dec(999, 2));
    assert_eq!(policy.shipping_for(Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn currency_formatting_rounds_half_away_from_zero() {
    assert_eq!(format_currency(dec(12345, 3)), "12.35");
    assert_eq!(format_currency(dec(5, 0)), "5.00");
    assert_eq!(format_currency(dec(1, 3)), "0.00");
    assert_eq!(round_money(dec(-2345, 3)), dec(-235, 2));
}

#[test]
fn order_commission_sums_rounded_lines() {
    let a = line(dec(2499, 2), 1);
    let b = line(dec(2499, 2), 1);

    assert_eq!(line_commission(&line(dec(2499, 2), 3), "T-Shirt"), dec(23079, 3));
    // 7.693 + 7.693 rounds per line to 7.69 + 7.69
    assert_eq!(order_commission([(&a, "T-Shirt"), (&b, "T-Shirt")]), dec(1538, 2));
}
