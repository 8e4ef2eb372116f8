//! HTTP handlers for the loan lifecycle

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::loan::{
    CreateLoanRequest, ListLoansQuery, LoanApplication, LoanService, LoanStatistics,
    LoanWithFarmer, UpdateLoanStatusRequest,
};
use crate::models::{Actor, ApiResponse};

pub async fn create_loan(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
    Json(payload): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoanApplication>>), ApiError> {
    let loan = service.create_loan_application(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(loan))))
}

pub async fn list_loans(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<ApiResponse<Vec<LoanWithFarmer>>>, ApiError> {
    let loans = service.list_all(&actor, query).await?;
    Ok(Json(ApiResponse::success(loans)))
}

pub async fn list_my_loans(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
) -> Result<Json<ApiResponse<Vec<LoanApplication>>>, ApiError> {
    let loans = service.list_for_farmer(&actor).await?;
    Ok(Json(ApiResponse::success(loans)))
}

pub async fn get_loan(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoanApplication>>, ApiError> {
    let loan = service.get_loan(&actor, loan_id).await?;
    Ok(Json(ApiResponse::success(loan)))
}

pub async fn update_loan_status(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
    Path(loan_id): Path<Uuid>,
    Json(payload): Json<UpdateLoanStatusRequest>,
) -> Result<Json<ApiResponse<LoanApplication>>, ApiError> {
    let loan = service.update_status(&actor, loan_id, payload).await?;
    Ok(Json(ApiResponse::success(loan)))
}

pub async fn loan_statistics(
    State(service): State<Arc<LoanService>>,
    actor: Actor,
) -> Result<Json<ApiResponse<LoanStatistics>>, ApiError> {
    let stats = service.statistics(&actor).await?;
    Ok(Json(ApiResponse::success(stats)))
}
