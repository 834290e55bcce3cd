use axum::{
    Json, Router,
    extract::Query,
    routing::{get, post},
};

use crate::{
    dto::pricing::{CommissionQuote, CommissionQuoteRequest, RangeQuery, RecommendedRange},
    error::{AppError, AppResult},
    pricing::{ProductKind, calculate_commission, format_currency},
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commission", post(quote_commission))
        .route("/recommended-range", get(recommended_range))
}

#[utoipa::path(
    post,
    path = "/api/pricing/commission",
    request_body = CommissionQuoteRequest,
    responses(
        (status = 200, description = "Commission the partner earns at this price", body = ApiResponse<CommissionQuote>),
        (status = 400, description = "Negative price")
    ),
    tag = "Pricing"
)]
pub async fn quote_commission(
    Json(payload): Json<CommissionQuoteRequest>,
) -> AppResult<Json<ApiResponse<CommissionQuote>>> {
    if payload.price.is_sign_negative() {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let breakdown = calculate_commission(payload.price, payload.category.label());
    Ok(Json(ApiResponse::ok(CommissionQuote {
        commission_display: format_currency(breakdown.commission),
        platform_fee_display: format_currency(breakdown.platform_fee),
        breakdown,
    })))
}

#[utoipa::path(
    get,
    path = "/api/pricing/recommended-range",
    params(
        ("category" = String, Query, description = "Free-text category, e.g. T-Shirts")
    ),
    responses(
        (status = 200, description = "Suggested retail range", body = ApiResponse<RecommendedRange>)
    ),
    tag = "Pricing"
)]
pub async fn recommended_range(
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<ApiResponse<RecommendedRange>>> {
    let kind = ProductKind::from_category(&query.category);
    Ok(Json(ApiResponse::ok(RecommendedRange {
        category: query.category,
        kind,
        threshold: kind.threshold(),
        range: kind.recommended_range(),
    })))
}
