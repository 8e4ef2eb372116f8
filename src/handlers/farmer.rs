//! HTTP handlers for the farmer back office (administrator only)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::farmer::{FarmerDeletion, FarmerService, UpdateFarmerRequest};
use crate::middleware::AdminActor;
use crate::models::{ApiResponse, UserResponse};

pub async fn list_farmers(
    State(service): State<Arc<FarmerService>>,
    _admin: AdminActor,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let farmers = service.list_farmers().await?;
    let farmers: Vec<UserResponse> = farmers.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::success(farmers)))
}

pub async fn get_farmer(
    State(service): State<Arc<FarmerService>>,
    _admin: AdminActor,
    Path(farmer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let farmer = service.get_farmer(farmer_id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(farmer))))
}

pub async fn update_farmer(
    State(service): State<Arc<FarmerService>>,
    _admin: AdminActor,
    Path(farmer_id): Path<Uuid>,
    Json(payload): Json<UpdateFarmerRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let farmer = service.update_farmer(farmer_id, payload).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(farmer))))
}

pub async fn delete_farmer(
    State(service): State<Arc<FarmerService>>,
    _admin: AdminActor,
    Path(farmer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FarmerDeletion>>, ApiError> {
    let outcome = service.delete_farmer(farmer_id).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
