use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::loan;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/loans", get(loan::list_loans).post(loan::create_loan))
        .route("/api/loans/mine", get(loan::list_my_loans))
        .route("/api/loans/stats", get(loan::loan_statistics))
        .route("/api/loans/:id", get(loan::get_loan))
        .route("/api/loans/:id/status", patch(loan::update_loan_status))
}
