use creative_print_api::{
    cart::{Cart, CartError, CartProduct, CartStore},
    error::AppError,
    pricing::{CategoryRef, PricedLine, ShippingPolicy},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn product(id: Uuid, price: i64, stock: Option<u32>) -> CartProduct {
    CartProduct {
        id,
        variant_id: None,
        name: "Ferris Tee".into(),
        price: Some(Decimal::new(price, 2)),
        base_price: Some(Decimal::new(price, 2)),
        category: CategoryRef::from("T-Shirts"),
        stock,
    }
}

#[test]
fn adding_same_product_merges_quantity() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();

    cart.add(product(id, 2000, None), 2).unwrap();
    let entry = cart.add(product(id, 2200, None), 3).unwrap();

    assert_eq!(entry.quantity, 5);
    // Latest snapshot wins.
    assert_eq!(entry.unit_price(), Decimal::new(2200, 2));
    assert_eq!(cart.entries.len(), 1);
    assert!(cart.is_open);
}

fn variant(id: Uuid, variant_id: Uuid, price: i64, stock: u32) -> CartProduct {
    CartProduct {
        variant_id: Some(variant_id),
        ..product(id, price, Some(stock))
    }
}

#[test]
fn variants_of_one_product_stay_separate() {
    let id = Uuid::new_v4();
    let red_s = Uuid::new_v4();
    let blue_xl = Uuid::new_v4();
    let mut cart = Cart::default();

    cart.add(variant(id, red_s, 2000, 5), 2).unwrap();
    let entry = cart.add(variant(id, blue_xl, 2500, 10), 1).unwrap();
    assert_eq!(entry.quantity, 1);
    assert_eq!(cart.entries.len(), 2);
    assert_eq!(cart.entries[0].unit_price(), Decimal::new(2000, 2));
    assert_eq!(cart.entries[0].quantity, 2);
    assert_eq!(cart.entries[1].unit_price(), Decimal::new(2500, 2));

    // Stock is per variant, so one blue XL left still fits next to two red S.
    let mut cart = Cart::default();
    cart.add(variant(id, red_s, 2000, 5), 2).unwrap();
    assert!(cart.add(variant(id, blue_xl, 2500, 1), 1).is_ok());
    assert_eq!(cart.totals(&ShippingPolicy::default()).item_count, 3);
}

#[test]
fn update_and_remove_target_one_variant() {
    let id = Uuid::new_v4();
    let red_s = Uuid::new_v4();
    let blue_xl = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(variant(id, red_s, 2000, 5), 1).unwrap();
    cart.add(variant(id, blue_xl, 2500, 10), 1).unwrap();

    cart.update_quantity(id, Some(blue_xl), 4).unwrap();
    assert_eq!(cart.entries[0].quantity, 1);
    assert_eq!(cart.entries[1].quantity, 4);
    assert_eq!(
        cart.update_quantity(id, None, 2).unwrap_err(),
        CartError::NotInCart(id)
    );

    let removed = cart.remove(id, Some(red_s)).unwrap();
    assert_eq!(removed.product.variant_id, Some(red_s));
    assert_eq!(cart.entries.len(), 1);
    assert_eq!(cart.entries[0].product.variant_id, Some(blue_xl));
}

#[test]
fn deduct_keeps_items_added_after_snapshot() {
    let shirt = Uuid::new_v4();
    let mug = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product(shirt, 2000, None), 2).unwrap();
    let ordered = cart.entries.clone();

    // Added while checkout was running.
    cart.add(product(shirt, 2000, None), 1).unwrap();
    cart.add(product(mug, 1000, None), 1).unwrap();

    cart.deduct(&ordered);
    assert_eq!(cart.entries.len(), 2);
    assert_eq!(cart.entries[0].product.id, shirt);
    assert_eq!(cart.entries[0].quantity, 1);
    assert_eq!(cart.entries[1].product.id, mug);

    let rest = cart.entries.clone();
    cart.deduct(&rest);
    assert!(cart.is_empty());
}

#[test]
fn zero_quantity_is_rejected() {
    let mut cart = Cart::default();
    let err = cart.add(product(Uuid::new_v4(), 1000, None), 0).unwrap_err();

    assert_eq!(err, CartError::InvalidQuantity);
    assert!(cart.is_empty());
    assert!(!cart.is_open);
}

#[test]
fn merged_quantity_is_checked_against_stock() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();

    cart.add(product(id, 1000, Some(3)), 2).unwrap();
    let err = cart.add(product(id, 1000, Some(3)), 2).unwrap_err();

    assert_eq!(
        err,
        CartError::InsufficientStock {
            product_id: id,
            available: 3
        }
    );
    assert_eq!(cart.entries[0].quantity, 2);
}

#[test]
fn non_positive_update_leaves_cart_unchanged() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product(id, 1000, None), 2).unwrap();

    assert_eq!(cart.update_quantity(id, None, 0).unwrap(), None);
    assert_eq!(cart.update_quantity(id, None, -4).unwrap(), None);
    assert_eq!(cart.entries[0].quantity, 2);

    let updated = cart.update_quantity(id, None, 7).unwrap().unwrap();
    assert_eq!(updated.quantity, 7);
}

#[test]
fn update_respects_stock_and_membership() {
    let id = Uuid::new_v4();
    let missing = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product(id, 1000, Some(4)), 1).unwrap();

    assert!(matches!(
        cart.update_quantity(id, None, 5),
        Err(CartError::InsufficientStock { available: 4, .. })
    ));
    assert_eq!(
        cart.update_quantity(missing, None, 1).unwrap_err(),
        CartError::NotInCart(missing)
    );
}

#[test]
fn remove_returns_the_entry() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    cart.add(product(id, 1000, None), 1).unwrap();

    let removed = cart.remove(id, None).unwrap();
    assert_eq!(removed.product.id, id);
    assert!(cart.is_empty());
    assert_eq!(cart.remove(id, None).unwrap_err(), CartError::NotInCart(id));
}

#[test]
fn open_close_and_clear() {
    let mut cart = Cart::default();
    cart.open();
    assert!(cart.is_open);
    cart.add(product(Uuid::new_v4(), 1000, None), 1).unwrap();
    cart.close();
    assert!(!cart.is_open);

    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn effective_price_falls_back_to_base_then_zero() {
    let mut p = product(Uuid::new_v4(), 1500, None);
    p.price = None;
    assert_eq!(p.effective_price(), Decimal::new(1500, 2));

    p.base_price = None;
    assert_eq!(p.effective_price(), Decimal::ZERO);
}

#[test]
fn cart_totals_use_policy() {
    let mut cart = Cart::default();
    cart.add(product(Uuid::new_v4(), 1000, None), 2).unwrap();
    cart.add(product(Uuid::new_v4(), 500, None), 1).unwrap();

    let totals = cart.totals(&ShippingPolicy::default());
    assert_eq!(totals.item_count, 3);
    assert_eq!(totals.total, Decimal::new(4250, 2));
}

#[test]
fn cart_errors_map_to_http_errors() {
    let id = Uuid::new_v4();
    assert!(matches!(
        AppError::from(CartError::NotInCart(id)),
        AppError::NotFound
    ));
    assert!(matches!(
        AppError::from(CartError::InvalidQuantity),
        AppError::BadRequest(_)
    ));
}

#[tokio::test]
async fn store_keeps_one_cart_per_user() {
    let store = CartStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let id = Uuid::new_v4();

    let shared = store.clone();
    shared
        .with_cart(alice, |cart| cart.add(product(id, 1000, None), 2).map(|e| e.quantity))
        .await
        .unwrap();

    let cart = store.get(alice).await;
    assert_eq!(cart.entries.len(), 1);
    assert_eq!(cart.entries[0].quantity, 2);
    assert!(store.get(bob).await.is_empty());

    store.with_cart(alice, |cart| cart.clear()).await;
    assert!(store.get(alice).await.is_empty());
}
