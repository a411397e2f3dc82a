use crate::dtos::{
    CreateTaxConfigurationRequest, ListTaxConfigurationsParams, SeedResponse,
    TaxConfigurationListResponse, UpdateTaxConfigurationRequest,
};
use crate::models::UpdateTaxConfiguration;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn list_tax_configurations(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Query(params): Query<ListTaxConfigurationsParams>,
) -> Result<impl IntoResponse, AppError> {
    let configurations = state
        .tax_service
        .list_tax_configurations(organization_id, params.active_only)
        .await?;
    Ok(Json(TaxConfigurationListResponse::from(configurations)))
}

pub async fn create_tax_configuration(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Json(req): Json<CreateTaxConfigurationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let organization_type = match req.organization_type {
        Some(organization_type) => organization_type,
        None => {
            state
                .tax_service
                .get_organization(organization_id)
                .await?
                .organization_type
        }
    };

    let input = req.into_input(organization_id, organization_type);
    let configuration = state.tax_service.create_tax_configuration(&input).await?;
    Ok((StatusCode::CREATED, Json(configuration)))
}

pub async fn seed_tax_configurations(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .tax_service
        .seed_default_configurations(organization_id)
        .await?;
    Ok((StatusCode::CREATED, Json(SeedResponse { created })))
}

pub async fn get_tax_configuration(
    State(state): State<AppState>,
    Path((organization_id, tax_configuration_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let configuration = state
        .tax_service
        .get_tax_configuration(organization_id, tax_configuration_id)
        .await?;
    Ok(Json(configuration))
}

pub async fn update_tax_configuration(
    State(state): State<AppState>,
    Path((organization_id, tax_configuration_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaxConfigurationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let patch = UpdateTaxConfiguration::from(req);
    let configuration = state
        .tax_service
        .update_tax_configuration(organization_id, tax_configuration_id, &patch)
        .await?;
    Ok(Json(configuration))
}

pub async fn delete_tax_configuration(
    State(state): State<AppState>,
    Path((organization_id, tax_configuration_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .tax_service
        .delete_tax_configuration(organization_id, tax_configuration_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
