use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, record},
    dto::catalog::{CreateDesignRequest, DesignList},
    entity::designs::{ActiveModel, Column, Entity as Designs, Model as DesignModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    models::Design,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const MAX_DESCRIPTION: usize = 1000;

pub async fn create_design(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDesignRequest,
) -> AppResult<ApiResponse<Design>> {
    ensure_role(user, Role::Partner)?;
    validate_design(&payload)?;

    let elements: Vec<String> = payload
        .elements
        .into_iter()
        .map(|url| url.trim().to_string())
        .collect();

    let design = ActiveModel {
        id: Set(Uuid::new_v4()),
        partner_id: Set(user.user_id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        design_url: Set(payload.design_url),
        elements: Set(serde_json::json!(elements)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(design_id = %design.id, partner_id = %user.user_id, "design created");
    record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "design_create",
            "designs",
            serde_json::json!({ "design_id": design.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Design created",
        design_from_entity(design),
        Some(Meta::empty()),
    ))
}

/// The caller's own designs, newest first.
pub async fn list_designs(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<DesignList>> {
    ensure_role(user, Role::Partner)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Designs::find()
        .filter(Column::PartnerId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(design_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Designs",
        DesignList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub fn validate_design(payload: &CreateDesignRequest) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if payload
        .description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION)
    {
        return Err(AppError::BadRequest(format!(
            "description must be at most {MAX_DESCRIPTION} characters"
        )));
    }
    if payload.elements.iter().any(|url| url.trim().is_empty()) {
        return Err(AppError::BadRequest("design elements must not be empty".into()));
    }
    Ok(())
}

fn design_from_entity(model: DesignModel) -> Design {
    Design {
        id: model.id,
        partner_id: model.partner_id,
        name: model.name,
        description: model.description,
        design_url: model.design_url,
        // Rows are only ever written from a string list.
        elements: serde_json::from_value(model.elements).unwrap_or_default(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
