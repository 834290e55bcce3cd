use creative_print_api::{config::shipping_from_vars, pricing::ShippingPolicy};
use rust_decimal::Decimal;

#[test]
fn unset_variables_keep_defaults() {
    let policy = shipping_from_vars(None, None).unwrap();
    assert_eq!(policy, ShippingPolicy::default());
    assert_eq!(policy.free_over, Some(Decimal::new(100, 0)));
    assert_eq!(policy.flat_fee, Decimal::new(15, 0));
}

#[test]
fn none_disables_free_shipping() {
    assert_eq!(shipping_from_vars(Some("none"), None).unwrap().free_over, None);
    assert_eq!(shipping_from_vars(Some(""), None).unwrap().free_over, None);
}

#[test]
fn custom_values_are_parsed() {
    let policy = shipping_from_vars(Some("50"), Some(" 9.99 ")).unwrap();
    assert_eq!(policy.free_over, Some(Decimal::new(50, 0)));
    assert_eq!(policy.flat_fee, Decimal::new(999, 2));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(shipping_from_vars(Some("lots"), None).is_err());
    assert!(shipping_from_vars(None, Some("-1")).is_err());
    assert!(shipping_from_vars(Some("-100"), None).is_err());
    assert_eq!(
        shipping_from_vars(Some("0"), None).unwrap().free_over,
        Some(Decimal::ZERO)
    );
    assert_eq!(
        shipping_from_vars(None, Some("")).unwrap().flat_fee,
        Decimal::new(15, 0)
    );
}
