use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, record},
    dto::products::{
        CreateProductRequest, DesignPlacement, ProductCommission, ProductList,
        UpdateProductRequest, VariantCommission, VariantRequest,
    },
    entity::{
        designs::Entity as Designs,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        product_designs::{
            ActiveModel as ProductDesignActive, Column as ProductDesignCol,
            Entity as ProductDesigns, Model as ProductDesignModel,
        },
        product_variants::{
            ActiveModel as VariantActive, Column as VariantCol, Entity as ProductVariants,
            Model as VariantModel,
        },
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_partner_or_admin},
    models::{Product, ProductDesign, ProductVariant, ProductWithVariants},
    pricing::calculate_commission,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Category).ilike(format!("%{}%", category)));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::BasePrice.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::BasePrice.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::BasePrice,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ProductWithVariants>> {
    let product = find_product(&state.orm, id).await?;
    let variants = variants_of(&state.orm, &product).await?;
    let designs = designs_of(&state.orm, product.id).await?;
    Ok(ApiResponse::success(
        "Product",
        ProductWithVariants {
            product: product_from_entity(product),
            variants,
            designs,
        },
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductWithVariants>> {
    ensure_partner_or_admin(user)?;
    validate_product_fields(&payload.name, &payload.category, payload.base_price)?;
    for variant in &payload.variants {
        validate_variant(variant)?;
    }
    if payload.designs.iter().any(|d| d.placement.trim().is_empty()) {
        return Err(AppError::BadRequest("design placement is required".into()));
    }

    let txn = state.orm.begin().await?;
    for placement in &payload.designs {
        ensure_design_owner(&txn, user, placement).await?;
    }

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        partner_id: Set(Some(user.user_id)),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(payload.category.trim().to_string()),
        base_price: Set(payload.base_price),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut variants = Vec::with_capacity(payload.variants.len());
    for variant in payload.variants {
        let model = VariantActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            size: Set(variant.size),
            color: Set(variant.color),
            price_adjustment: Set(variant.price_adjustment),
            stock: Set(variant.stock),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        variants.push(variant_from_entity(model, product.base_price));
    }

    let mut designs = Vec::with_capacity(payload.designs.len());
    for placement in payload.designs {
        let model = ProductDesignActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            design_id: Set(placement.design_id),
            placement: Set(placement.placement.trim().to_string()),
        }
        .insert(&txn)
        .await
        .map_err(|err| AppError::unique_conflict(err, "Design is already placed there"))?;
        designs.push(product_design_from_entity(model));
    }
    txn.commit().await?;

    tracing::info!(product_id = %product.id, variants = variants.len(), "product created");
    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "product_create",
            "products",
            serde_json::json!({ "product_id": product.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        ProductWithVariants {
            product: product_from_entity(product),
            variants,
            designs,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product(&state.orm, id).await?;
    ensure_owner(user, &existing)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        validate_category(&category)?;
        active.category = Set(category.trim().to_string());
    }
    if let Some(base_price) = payload.base_price {
        if base_price < Decimal::ZERO {
            return Err(AppError::BadRequest("base_price must not be negative".into()));
        }
        active.base_price = Set(base_price);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "product_update",
            "products",
            serde_json::json!({ "product_id": product.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_product(&state.orm, id).await?;
    ensure_owner(user, &existing)?;

    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::Conflict(
            "product has been ordered and cannot be deleted".into(),
        ));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "product_delete",
            "products",
            serde_json::json!({ "product_id": id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Commission the partner earns per unit, for the base price and each variant.
pub async fn product_commission(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ProductCommission>> {
    let product = find_product(&state.orm, id).await?;
    let variants = variants_of(&state.orm, &product)
        .await?
        .into_iter()
        .map(|variant| VariantCommission {
            variant_id: variant.id,
            breakdown: calculate_commission(variant.price, &product.category),
            size: variant.size,
            color: variant.color,
        })
        .collect();

    Ok(ApiResponse::success(
        "Commission",
        ProductCommission {
            product_id: product.id,
            base: calculate_commission(product.base_price, &product.category),
            category: product.category,
            variants,
        },
        Some(Meta::empty()),
    ))
}

pub(crate) async fn find_product<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Loads a product and the variant a cart line refers to.
pub(crate) async fn find_product_variant<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    variant_id: Option<Uuid>,
) -> AppResult<(ProductModel, Option<VariantModel>)> {
    let product = find_product(conn, product_id).await?;
    let variants = ProductVariants::find()
        .filter(VariantCol::ProductId.eq(product_id))
        .all(conn)
        .await?;
    let variant = select_variant(product_id, variants, variant_id)?;
    Ok((product, variant))
}

/// Picks the variant a cart line refers to. A product with variants must name
/// one of its own; a product without variants is sold as-is.
pub fn select_variant(
    product_id: Uuid,
    variants: Vec<VariantModel>,
    variant_id: Option<Uuid>,
) -> AppResult<Option<VariantModel>> {
    match variant_id {
        Some(variant_id) => variants
            .into_iter()
            .find(|v| v.id == variant_id)
            .map(Some)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "variant {variant_id} does not belong to product {product_id}"
                ))
            }),
        None if variants.is_empty() => Ok(None),
        None => Err(AppError::BadRequest(format!(
            "product {product_id} has variants, variant_id is required"
        ))),
    }
}

async fn variants_of<C: ConnectionTrait>(
    conn: &C,
    product: &ProductModel,
) -> AppResult<Vec<ProductVariant>> {
    let variants = ProductVariants::find()
        .filter(VariantCol::ProductId.eq(product.id))
        .order_by_asc(VariantCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(|model| variant_from_entity(model, product.base_price))
        .collect();
    Ok(variants)
}

async fn designs_of<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<Vec<ProductDesign>> {
    let designs = ProductDesigns::find()
        .filter(ProductDesignCol::ProductId.eq(product_id))
        .all(conn)
        .await?
        .into_iter()
        .map(product_design_from_entity)
        .collect();
    Ok(designs)
}

/// Partners may only place their own designs; admins may place any.
async fn ensure_design_owner<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    placement: &DesignPlacement,
) -> AppResult<()> {
    let design = Designs::find_by_id(placement.design_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("design {} does not exist", placement.design_id))
        })?;
    if user.is_admin() || design.partner_id == user.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn ensure_owner(user: &AuthUser, product: &ProductModel) -> AppResult<()> {
    ensure_partner_or_admin(user)?;
    if user.is_admin() || product.partner_id == Some(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn validate_product_fields(name: &str, category: &str, base_price: Decimal) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    validate_category(category)?;
    if base_price < Decimal::ZERO {
        return Err(AppError::BadRequest("base_price must not be negative".into()));
    }
    Ok(())
}

fn validate_category(category: &str) -> AppResult<()> {
    if category.trim().is_empty() {
        return Err(AppError::BadRequest("category must not be empty".into()));
    }
    Ok(())
}

fn validate_variant(variant: &VariantRequest) -> AppResult<()> {
    if variant.stock < 0 {
        return Err(AppError::BadRequest("variant stock must not be negative".into()));
    }
    if variant.size.trim().is_empty() || variant.color.trim().is_empty() {
        return Err(AppError::BadRequest("variant size and color are required".into()));
    }
    Ok(())
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        partner_id: model.partner_id,
        name: model.name,
        description: model.description,
        category: model.category,
        base_price: model.base_price,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn variant_from_entity(model: VariantModel, base_price: Decimal) -> ProductVariant {
    ProductVariant {
        id: model.id,
        product_id: model.product_id,
        price: base_price + model.price_adjustment,
        size: model.size,
        color: model.color,
        price_adjustment: model.price_adjustment,
        stock: model.stock,
    }
}

fn product_design_from_entity(model: ProductDesignModel) -> ProductDesign {
    ProductDesign {
        id: model.id,
        product_id: model.product_id,
        design_id: model.design_id,
        placement: model.placement,
    }
}
