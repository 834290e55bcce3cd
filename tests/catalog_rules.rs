use chrono::Utc;
use creative_print_api::{
    dto::catalog::CreateDesignRequest,
    entity::product_variants::Model as VariantModel,
    error::AppError,
    services::{design_service::validate_design, product_service::select_variant},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn variant_row(product_id: Uuid, size: &str) -> VariantModel {
    VariantModel {
        id: Uuid::new_v4(),
        product_id,
        size: size.into(),
        color: "Black".into(),
        price_adjustment: Decimal::ZERO,
        stock: 5,
        created_at: Utc::now().fixed_offset(),
    }
}

fn design(name: &str) -> CreateDesignRequest {
    CreateDesignRequest {
        name: name.into(),
        description: None,
        design_url: Some("https://cdn.example.com/d/1.png".into()),
        elements: vec!["https://cdn.example.com/e/1.png".into()],
    }
}

#[test]
fn product_with_variants_requires_a_variant() {
    let product_id = Uuid::new_v4();
    let variants = vec![variant_row(product_id, "S"), variant_row(product_id, "XL")];

    let err = select_variant(product_id, variants, None).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("variant_id is required")));
}

#[test]
fn named_variant_must_belong_to_product() {
    let product_id = Uuid::new_v4();
    let variants = vec![variant_row(product_id, "S"), variant_row(product_id, "XL")];
    let xl = variants[1].id;

    let picked = select_variant(product_id, variants.clone(), Some(xl)).unwrap();
    assert_eq!(picked.map(|v| v.size), Some("XL".to_string()));

    let stranger = Uuid::new_v4();
    assert!(matches!(
        select_variant(product_id, variants, Some(stranger)),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn product_without_variants_is_sold_as_is() {
    let product_id = Uuid::new_v4();
    assert!(select_variant(product_id, Vec::new(), None).unwrap().is_none());
    assert!(select_variant(product_id, Vec::new(), Some(Uuid::new_v4())).is_err());
}

#[test]
fn design_validation() {
    assert!(validate_design(&design("Sunset")).is_ok());
    assert!(validate_design(&design("   ")).is_err());

    let mut long = design("Sunset");
    long.description = Some("x".repeat(1001));
    assert!(validate_design(&long).is_err());

    let mut blank_element = design("Sunset");
    blank_element.elements.push(" ".into());
    assert!(validate_design(&blank_element).is_err());
}
