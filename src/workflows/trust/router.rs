use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::breakdown::ScoreBreakdown;
use super::domain::VendorId;
use super::repository::{ProfileStore, RecalculationService, StoreError, VerificationQueue};
use super::service::{TrustProfileService, TrustServiceError};

/// Router builder exposing the trust engine over HTTP.
pub fn trust_router<S, R, Q>(service: Arc<TrustProfileService<S, R, Q>>) -> Router
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    Router::new()
        .route(
            "/api/v1/vendors/:vendor_id/trust",
            get(profile_handler::<S, R, Q>).post(provision_handler::<S, R, Q>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust/breakdown",
            get(breakdown_handler::<S, R, Q>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust/recovery/goals",
            post(generate_goals_handler::<S, R, Q>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust/recovery/goals/:index",
            put(update_goal_handler::<S, R, Q>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust/recovery/complete",
            post(complete_recovery_handler::<S, R, Q>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust/verification-request",
            post(request_verification_handler::<S, R, Q>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoalProgressUpdate {
    pub(crate) current_value: u32,
}

pub(crate) async fn profile_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.profile(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.trust_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn provision_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.provision(&id) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.trust_view())).into_response(),
        Err(err) => error_response(err),
    }
}

/// The breakdown is a display estimate, so an unknown vendor gets the zero
/// breakdown rather than an error.
pub(crate) async fn breakdown_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.breakdown(&id) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(TrustServiceError::Store(StoreError::NotFound)) => {
            (StatusCode::OK, axum::Json(ScoreBreakdown::zero())).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn generate_goals_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.generate_goals(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.trust_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_goal_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path((vendor_id, index)): Path<(String, usize)>,
    axum::Json(update): axum::Json<GoalProgressUpdate>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.update_goal_progress(&id, index, update.current_value) {
        Ok(record) => (StatusCode::OK, axum::Json(record.trust_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_recovery_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.complete_recovery(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.trust_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn request_verification_handler<S, R, Q>(
    State(service): State<Arc<TrustProfileService<S, R, Q>>>,
    Path(vendor_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
    R: RecalculationService + 'static,
    Q: VerificationQueue + 'static,
{
    let id = VendorId(vendor_id);
    match service.request_verification(&id) {
        Ok(request) => {
            let payload = json!({
                "status": "queued",
                "vendor_id": request.vendor_id.0,
                "requested_at": request.requested_at,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: TrustServiceError) -> Response {
    let status = match &err {
        TrustServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrustServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        TrustServiceError::Store(StoreError::Conflict)
        | TrustServiceError::Store(StoreError::RevisionMismatch) => StatusCode::CONFLICT,
        TrustServiceError::Store(StoreError::Unavailable(_))
        | TrustServiceError::Recalculation(_)
        | TrustServiceError::Verification(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
