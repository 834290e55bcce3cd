use creative_print_api::status::OrderStatus;

#[test]
fn lifecycle_transitions() {
    use OrderStatus::*;

    assert!(Pending.can_transition_to(PendingPayment));
    assert!(PendingPayment.can_transition_to(PaymentReceived));
    assert!(PaymentFailed.can_transition_to(PendingPayment));
    assert!(PaymentReceived.can_transition_to(InProduction));
    assert!(InProduction.can_transition_to(Shipped));
    assert!(Shipped.can_transition_to(Delivered));
    assert!(Delivered.can_transition_to(Refunded));

    assert!(!Pending.can_transition_to(Shipped));
    assert!(!Shipped.can_transition_to(Cancelled));
    assert!(!Delivered.can_transition_to(Pending));
}

#[test]
fn terminal_statuses_go_nowhere() {
    for status in [OrderStatus::Cancelled, OrderStatus::Refunded] {
        assert!(status.next_statuses().is_empty());
        for next in OrderStatus::ALL {
            assert_eq!(status.can_transition_to(next), next == status);
        }
    }
}

#[test]
fn same_status_is_always_allowed() {
    for status in OrderStatus::ALL {
        assert!(status.can_transition_to(status));
    }
}

#[test]
fn parses_case_insensitively() {
    assert_eq!("in_production".parse::<OrderStatus>().unwrap(), OrderStatus::InProduction);
    assert_eq!(" PENDING ".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
    assert!("shipped-ish".parse::<OrderStatus>().is_err());

    for status in OrderStatus::ALL {
        assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
    }
}

#[test]
fn serializes_screaming_snake_case() {
    let json = serde_json::to_string(&OrderStatus::PaymentReceived).unwrap();
    assert_eq!(json, "\"PAYMENT_RECEIVED\"");

    let parsed: OrderStatus = serde_json::from_str("\"PENDING_PAYMENT\"").unwrap();
    assert_eq!(parsed, OrderStatus::PendingPayment);
}

#[test]
fn only_paid_statuses_count_as_sales() {
    let sales: Vec<_> = OrderStatus::ALL
        .into_iter()
        .filter(OrderStatus::counts_as_sale)
        .collect();
    assert_eq!(
        sales,
        vec![
            OrderStatus::PaymentReceived,
            OrderStatus::InProduction,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ]
    );
}
