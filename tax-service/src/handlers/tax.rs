use crate::dtos::{CalculateOrderTaxRequest, PreviewParams, ValidateItemsRequest};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

pub async fn calculate_order_tax(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Json(req): Json<CalculateOrderTaxRequest>,
) -> Result<impl IntoResponse, AppError> {
    let totals = state
        .tax_service
        .calculate_order_tax(
            organization_id,
            req.organization_type,
            req.service_type,
            &req.items,
        )
        .await?;
    Ok(Json(totals))
}

pub async fn get_tax_preview(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Query(params): Query<PreviewParams>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state
        .tax_service
        .get_tax_preview(organization_id, params.service_type)
        .await?;
    Ok(Json(preview))
}

pub async fn validate_items(
    State(state): State<AppState>,
    Json(req): Json<ValidateItemsRequest>,
) -> Result<StatusCode, AppError> {
    state
        .tax_service
        .validate_tax_calculation_params(&req.items)?;
    Ok(StatusCode::NO_CONTENT)
}
