use uuid::Uuid;

use crate::{
    cart::{CartError, CartProduct},
    dto::cart::{AddToCartRequest, CartView, UpdateCartItemRequest},
    entity::{product_variants::Model as VariantModel, products::Model as ProductModel},
    error::AppResult,
    middleware::auth::AuthUser,
    pricing::CategoryRef,
    response::{ApiResponse, Meta},
    services::product_service::find_product_variant,
    state::AppState,
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.get(user.user_id).await;
    let count = cart.entries.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CartView::new(&cart, &state.shipping),
        Some(Meta::new(1, count, count)),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(CartError::InvalidQuantity.into());
    }
    let quantity = u32::try_from(payload.quantity).unwrap_or(u32::MAX);

    let (product, variant) =
        find_product_variant(&state.orm, payload.product_id, payload.variant_id).await?;
    let snapshot = snapshot(&product, variant.as_ref());

    let cart = state
        .carts
        .with_cart(user.user_id, |cart| -> Result<_, CartError> {
            cart.add(snapshot, quantity)?;
            Ok(cart.clone())
        })
        .await?;

    tracing::debug!(
        user_id = %user.user_id,
        product_id = %payload.product_id,
        quantity,
        "cart item added"
    );
    Ok(ApiResponse::success(
        "Added to cart",
        CartView::new(&cart, &state.shipping),
        Some(Meta::empty()),
    ))
}

/// Non-positive quantities leave the cart untouched.
pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let (changed, cart) = state
        .carts
        .with_cart(user.user_id, |cart| -> Result<_, CartError> {
            let changed = cart.update_quantity(product_id, variant_id, payload.quantity)?.is_some();
            Ok((changed, cart.clone()))
        })
        .await?;

    let message = if changed { "Quantity updated" } else { "Quantity unchanged" };
    Ok(ApiResponse::success(
        message,
        CartView::new(&cart, &state.shipping),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    variant_id: Option<Uuid>,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .with_cart(user.user_id, |cart| -> Result<_, CartError> {
            cart.remove(product_id, variant_id)?;
            Ok(cart.clone())
        })
        .await?;

    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::new(&cart, &state.shipping),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .with_cart(user.user_id, |cart| {
            cart.clear();
            cart.clone()
        })
        .await;

    Ok(ApiResponse::success(
        "Cart cleared",
        CartView::new(&cart, &state.shipping),
        Some(Meta::empty()),
    ))
}

pub async fn set_open(
    state: &AppState,
    user: &AuthUser,
    open: bool,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .with_cart(user.user_id, |cart| {
            if open {
                cart.open();
            } else {
                cart.close();
            }
            cart.clone()
        })
        .await;

    Ok(ApiResponse::ok(CartView::new(&cart, &state.shipping)))
}

/// Cart snapshot of a catalog product. With a variant the price includes its
/// adjustment and stock is bounded by the variant; without one the product is
/// print-on-demand and unbounded.
pub(crate) fn snapshot(product: &ProductModel, variant: Option<&VariantModel>) -> CartProduct {
    CartProduct {
        id: product.id,
        variant_id: variant.map(|v| v.id),
        name: product.name.clone(),
        price: variant.map(|v| product.base_price + v.price_adjustment),
        base_price: Some(product.base_price),
        category: CategoryRef::Label(product.category.clone()),
        stock: variant.map(|v| u32::try_from(v.stock).unwrap_or(0)),
    }
}
