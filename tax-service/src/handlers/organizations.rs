use crate::dtos::CreateOrganizationRequest;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn create_organization(
    State(state): State<AppState>,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let organization = state.tax_service.create_organization(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn get_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let organization = state.tax_service.get_organization(organization_id).await?;
    Ok(Json(organization))
}
