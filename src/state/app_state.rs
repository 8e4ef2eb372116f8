use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::farmer::FarmerService;
use crate::loan::LoanService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub loan_service: Arc<LoanService>,
    pub farmer_service: Arc<FarmerService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        loan_service: LoanService,
        farmer_service: FarmerService,
        auth_service: AuthService,
    ) -> Self {
        Self {
            pool,
            loan_service: Arc::new(loan_service),
            farmer_service: Arc::new(farmer_service),
            auth_service: Arc::new(auth_service),
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(state: &AppState) -> Self {
        state.loan_service.clone()
    }
}

impl FromRef<AppState> for Arc<FarmerService> {
    fn from_ref(state: &AppState) -> Self {
        state.farmer_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}
