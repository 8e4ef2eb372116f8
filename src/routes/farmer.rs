use axum::{routing::get, Router};

use crate::handlers::farmer;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/farmers", get(farmer::list_farmers))
        .route(
            "/api/farmers/:id",
            get(farmer::get_farmer)
                .put(farmer::update_farmer)
                .delete(farmer::delete_farmer),
        )
}
