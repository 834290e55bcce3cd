use creative_print_api::{
    cart::CartStore,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::AddToCartRequest,
        catalog::{CreateCategoryRequest, CreateDesignRequest},
        products::{CreateProductRequest, DesignPlacement, UpdateProductRequest, VariantRequest},
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::{AuthUser, Role},
    pricing::ShippingPolicy,
    routes::params::{OrderListQuery, Pagination},
    services::{
        cart_service, category_service, design_service, order_service, product_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Two partners list products under the same name, attach their own designs,
// and an admin curates categories and sees every order.
#[tokio::test]
async fn catalog_designs_and_admin_views() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let alice = user(&state, Role::Partner, "alice@example.com").await?;
    let bob = user(&state, Role::Partner, "bob@example.com").await?;
    let client = user(&state, Role::Client, "client@example.com").await?;
    let admin = user(&state, Role::Admin, "admin@example.com").await?;

    // Designs belong to the partner who saved them.
    let sunset = design_service::create_design(&state, &alice, design_request("Sunset"))
        .await?
        .data
        .unwrap();
    assert_eq!(sunset.partner_id, alice.user_id);
    assert_eq!(sunset.elements.len(), 1);
    assert!(matches!(
        design_service::create_design(&state, &client, design_request("Nope")).await,
        Err(AppError::Forbidden)
    ));
    let mine = design_service::list_designs(&state, &alice, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(mine.items.len(), 1);
    let theirs = design_service::list_designs(&state, &bob, Pagination::default())
        .await?
        .data
        .unwrap();
    assert!(theirs.items.is_empty());

    // Same product name from two partners.
    let tee = product_service::create_product(
        &state,
        &alice,
        product_request("Classic Tee", vec![placement(sunset.id, "front")]),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(tee.designs.len(), 1);
    assert_eq!(tee.designs[0].placement, "front");
    let bobs_tee = product_service::create_product(
        &state,
        &bob,
        product_request("Classic Tee", Vec::new()),
    )
    .await?
    .data
    .unwrap();
    assert_ne!(tee.product.id, bobs_tee.product.id);

    // Bob cannot print Alice's design.
    assert!(matches!(
        product_service::create_product(
            &state,
            &bob,
            product_request("Borrowed Tee", vec![placement(sunset.id, "back")]),
        )
        .await,
        Err(AppError::Forbidden)
    ));

    let fetched = product_service::get_product(&state, tee.product.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.designs.len(), 1);
    assert_eq!(fetched.designs[0].design_id, sunset.id);

    // A blank category is refused on update just like on create.
    let blank = product_service::update_product(
        &state,
        &alice,
        tee.product.id,
        UpdateProductRequest {
            name: None,
            description: None,
            category: Some("   ".into()),
            base_price: None,
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    // A product with variants cannot be bought without picking one.
    let no_variant = cart_service::add_to_cart(
        &state,
        &client,
        AddToCartRequest {
            product_id: tee.product.id,
            variant_id: None,
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(no_variant, Err(AppError::BadRequest(_))));

    for v in &tee.variants {
        cart_service::add_to_cart(
            &state,
            &client,
            AddToCartRequest {
                product_id: tee.product.id,
                variant_id: Some(v.id),
                quantity: 1,
            },
        )
        .await?;
    }
    let cart = state.carts.get(client.user_id).await;
    assert_eq!(cart.entries.len(), 2);

    order_service::checkout(&state, &client, Default::default()).await?;

    // Categories: public list, admin-only create, unique names.
    category_service::create_category(&state, &admin, category_request("T-Shirts")).await?;
    category_service::create_category(&state, &admin, category_request("Mugs")).await?;
    assert!(matches!(
        category_service::create_category(&state, &admin, category_request("Mugs")).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        category_service::create_category(&state, &alice, category_request("Caps")).await,
        Err(AppError::Forbidden)
    ));
    let categories = category_service::list_categories(&state)
        .await?
        .data
        .unwrap();
    let names: Vec<_> = categories.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Mugs", "T-Shirts"]);

    let all_orders = order_service::list_all_orders(&state, &admin, OrderListQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(all_orders.items.len(), 1);
    assert_eq!(all_orders.items[0].user_id, client.user_id);
    assert!(matches!(
        order_service::list_all_orders(&state, &client, OrderListQuery::default()).await,
        Err(AppError::Forbidden)
    ));

    Ok(())
}

fn design_request(name: &str) -> CreateDesignRequest {
    CreateDesignRequest {
        name: name.into(),
        description: Some("Warm gradient".into()),
        design_url: Some("https://cdn.example.com/designs/sunset.png".into()),
        elements: vec!["https://cdn.example.com/elements/sun.png".into()],
    }
}

fn product_request(name: &str, designs: Vec<DesignPlacement>) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        description: None,
        category: "T-Shirts".into(),
        base_price: Decimal::new(2499, 2),
        variants: vec![
            VariantRequest {
                size: "S".into(),
                color: "Red".into(),
                price_adjustment: Decimal::ZERO,
                stock: 5,
            },
            VariantRequest {
                size: "XL".into(),
                color: "Blue".into(),
                price_adjustment: Decimal::new(500, 2),
                stock: 10,
            },
        ],
        designs,
    }
}

fn placement(design_id: Uuid, placement: &str) -> DesignPlacement {
    DesignPlacement {
        design_id,
        placement: placement.into(),
    }
}

fn category_request(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.into(),
        description: None,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_status_history, order_items, orders, product_designs, designs, categories, product_variants, products, audit_logs, users CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        carts: CartStore::new(),
        shipping: ShippingPolicy::default(),
    })
}

async fn user(state: &AppState, role: Role, email: &str) -> anyhow::Result<AuthUser> {
    let model = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        display_name: Set(None),
        role: Set(role.as_str().into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: model.id,
        role,
    })
}
