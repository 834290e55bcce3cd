use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        catalog::{CreateDesignRequest, DesignList},
        partner::{PartnerDashboard, PartnerOrderList},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Design,
    response::ApiResponse,
    routes::params::Pagination,
    services::{design_service, partner_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_partner_orders))
        .route("/dashboard", get(dashboard))
        .route("/designs", get(list_designs).post(create_design))
}

#[utoipa::path(
    get,
    path = "/api/partner/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Orders containing the partner's products", body = ApiResponse<PartnerOrderList>),
        (status = 403, description = "Partners only")
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn list_partner_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PartnerOrderList>>> {
    let resp = partner_service::list_partner_orders(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/partner/dashboard",
    responses(
        (status = 200, description = "Sales, commission and recent activity", body = ApiResponse<PartnerDashboard>),
        (status = 403, description = "Partners only")
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PartnerDashboard>>> {
    let resp = partner_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/partner/designs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "The partner's designs, newest first", body = ApiResponse<DesignList>),
        (status = 403, description = "Partners only")
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn list_designs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<DesignList>>> {
    let resp = design_service::list_designs(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/partner/designs",
    request_body = CreateDesignRequest,
    responses(
        (status = 201, description = "Design saved", body = ApiResponse<Design>),
        (status = 400, description = "Invalid design"),
        (status = 403, description = "Partners only")
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn create_design(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDesignRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Design>>)> {
    let resp = design_service::create_design(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
