use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::trust::domain::TrustTier;
use crate::workflows::trust::memory::ScriptedRecalculation;

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn json_request(method: Method, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn profile_route_serialises_the_trust_view() {
    let (service, store, _, _) = build_service();
    seed(&store, distressed_profile("v-view"));
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/vendors/v-view/trust"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["vendor_id"], "v-view");
    assert_eq!(body["trust_score"], 48);
    assert_eq!(body["tier"]["label"], "Under Review");
    assert_eq!(body["tier"]["accent"], "rose");
    assert_eq!(body["verification_eligible"], false);
    assert_eq!(body["last_drop_reason"], "Dispute volume spike");
}

#[tokio::test]
async fn unknown_profile_returns_not_found() {
    let (service, _, _, _) = build_service();
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/vendors/v-ghost/trust"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn provisioning_returns_created_then_conflict() {
    let (service, _, _, _) = build_service();
    let app = trust_router_with_service(service);

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/api/v1/vendors/v-onboard/trust"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["trust_score"], 70);
    assert_eq!(body["tier"]["label"], "New or Improving");

    let response = app
        .oneshot(empty_request(Method::POST, "/api/v1/vendors/v-onboard/trust"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn breakdown_route_reports_zero_for_unknown_vendors() {
    let (service, _, _, _) = build_service();
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/vendors/v-ghost/trust/breakdown",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["components"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn goal_generation_route_returns_the_refreshed_view() {
    let (service, store, _, _) = build_service();
    seed(&store, distressed_profile("v-goals"));
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-goals/trust/recovery/goals",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let goals = body["goals"].as_array().expect("goal array");
    assert_eq!(goals.len(), 6);
    assert_eq!(goals[0]["kind"], "orders");
    assert_eq!(goals[0]["target_value"], 5);
}

#[tokio::test]
async fn goal_update_route_recomputes_progress() {
    let (service, store, _, _) = build_service();
    seed(&store, distressed_profile("v-progress"));
    let app = trust_router_with_service(service);

    app.clone()
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-progress/trust/recovery/goals",
        ))
        .await
        .expect("router responds");

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/vendors/v-progress/trust/recovery/goals/0",
            serde_json::json!({ "current_value": 5 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["goals"][0]["completed"], true);
    let progress = body["recovery_progress"].as_f64().expect("progress number");
    assert!((progress - 100.0 * 2.0 / 6.0).abs() < 1e-3);
}

#[tokio::test]
async fn out_of_range_goal_index_is_unprocessable() {
    let (service, store, _, _) = build_service();
    seed(&store, distressed_profile("v-oob"));
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/vendors/v-oob/trust/recovery/goals/9",
            serde_json::json!({ "current_value": 1 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn completion_route_surfaces_the_recalculated_profile() {
    let (service, store, recalculator, _) = build_service();
    seed(&store, distressed_profile("v-finish"));
    recalculator.script(ScriptedRecalculation {
        trust_score: 78,
        trust_tier: TrustTier::NewOrImproving,
        drop_reason: None,
        activate_recovery: false,
    });
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-finish/trust/recovery/complete",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["trust_score"], 78);
    assert_eq!(body["recovery_active"], false);
    assert_eq!(body["recovery_completed"], true);
}

#[tokio::test]
async fn failed_recalculation_maps_to_bad_gateway() {
    let (service, store, recalculator, _) = build_service();
    seed(&store, distressed_profile("v-down"));
    recalculator.fail_next("recalculation offline");
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-down/trust/recovery/complete",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn verification_route_accepts_eligible_vendors() {
    let (service, store, _, verification) = build_service();
    seed(&store, healthy_profile("v-worthy"));
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-worthy/trust/verification-request",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "queued");
    assert_eq!(body["vendor_id"], "v-worthy");
    assert_eq!(verification.requests().len(), 1);
}

#[tokio::test]
async fn verification_route_rejects_ineligible_vendors() {
    let (service, store, _, verification) = build_service();
    seed(&store, distressed_profile("v-unworthy"));
    let app = trust_router_with_service(service);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            "/api/v1/vendors/v-unworthy/trust/verification-request",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(verification.requests().is_empty());
}
