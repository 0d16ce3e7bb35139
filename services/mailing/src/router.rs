use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use courier_core::health::healthz;
use courier_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    attempt::get_attempts,
    health::readyz,
    mailing::{
        activate_mailing, create_mailing, deactivate_mailing, delete_mailing, get_mailing,
        get_mailings, update_mailing,
    },
    recipient::{
        block_recipient, create_recipient, get_recipient, get_recipients, unblock_recipient,
        update_recipient,
    },
    report::get_report,
    sweep::run_sweep,
    template::{create_template, get_template, get_templates, update_template},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Recipients
        .route("/recipients", post(create_recipient).get(get_recipients))
        .route("/recipients/{id}", get(get_recipient).patch(update_recipient))
        .route("/recipients/{id}/block", post(block_recipient))
        .route("/recipients/{id}/unblock", post(unblock_recipient))
        // Templates
        .route("/templates", post(create_template).get(get_templates))
        .route("/templates/{id}", get(get_template).patch(update_template))
        // Mailings
        .route("/mailings", post(create_mailing).get(get_mailings))
        .route(
            "/mailings/{id}",
            get(get_mailing)
                .patch(update_mailing)
                .delete(delete_mailing),
        )
        .route("/mailings/{id}/deactivate", post(deactivate_mailing))
        .route("/mailings/{id}/activate", post(activate_mailing))
        .route("/mailings/{id}/attempts", get(get_attempts))
        // Report
        .route("/report", get(get_report))
        // Sweep
        .route("/sweeps", post(run_sweep))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
