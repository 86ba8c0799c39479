use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use salon_bookings::config::AppConfig;
use salon_bookings::db;
use salon_bookings::routes;
use salon_bookings::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState::new(conn, test_config()))
}

fn test_app(state: Arc<AppState>) -> Router {
    routes::router(state)
}

fn admin_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", "Bearer test-token");
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn public_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn priya_booking() -> Value {
    json!({
        "customerName": "Priya Sharma",
        "customerPhone": "9876543210",
        "serviceName": "Hair Cutting & Styling",
        "serviceCategory": "beauty",
        "bookingDate": "2025-06-01T10:00:00Z"
    })
}

async fn create_booking(state: &Arc<AppState>) -> i64 {
    let (status, json) = send(
        state,
        admin_request("POST", "/api/admin/bookings", Some(priya_booking())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}

// ── Auth ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let state = test_state();
    let (status, json) = send(&state, public_request("GET", "/api/admin/bookings", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_admin_wrong_token() {
    let state = test_state();
    let req = Request::builder()
        .uri("/api/admin/customers")
        .header("Authorization", "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&state, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let (status, json) = send(&state, public_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Booking lifecycle ──

#[tokio::test]
async fn test_booking_create_then_confirm() {
    let state = test_state();

    let (status, created) = send(
        &state,
        admin_request("POST", "/api/admin/bookings", Some(priya_booking())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["customerName"], "Priya Sharma");
    assert_eq!(created["bookingDate"], "2025-06-01T10:00:00Z");
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &state,
        admin_request(
            "PATCH",
            &format!("/api/admin/bookings/{id}"),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmed");

    let (status, fetched) = send(
        &state,
        admin_request("GET", &format!("/api/admin/bookings/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "confirmed");
    assert_eq!(fetched["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn test_booking_update_by_query_id() {
    let state = test_state();
    let id = create_booking(&state).await;

    for next in ["confirmed", "completed"] {
        let (status, json) = send(
            &state,
            admin_request(
                "PATCH",
                &format!("/api/admin/bookings?id={id}"),
                Some(json!({"status": next})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], next);
    }

    let (_, list) = send(&state, admin_request("GET", "/api/admin/bookings", None)).await;
    assert_eq!(list[0]["status"], "completed");
}

#[tokio::test]
async fn test_booking_cannot_reopen_completed() {
    let state = test_state();
    let id = create_booking(&state).await;
    let uri = format!("/api/admin/bookings/{id}");

    for next in ["confirmed", "completed"] {
        let (status, _) =
            send(&state, admin_request("PATCH", &uri, Some(json!({"status": next})))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) =
        send(&state, admin_request("PATCH", &uri, Some(json!({"status": "pending"})))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "cannot move booking from completed to pending");
}

#[tokio::test]
async fn test_booking_cancel() {
    let state = test_state();
    let id = create_booking(&state).await;

    let (status, json) = send(
        &state,
        admin_request("POST", &format!("/api/admin/bookings/{id}/cancel"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "cancelled");

    let (status, _) = send(
        &state,
        admin_request(
            "PATCH",
            &format!("/api/admin/bookings/{id}"),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &state,
        admin_request("POST", "/api/admin/bookings/999/cancel", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &state,
        admin_request("POST", "/api/admin/bookings/abc/cancel", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid booking id");
}

#[tokio::test]
async fn test_booking_validation_failure_persists_nothing() {
    let state = test_state();
    let mut body = priya_booking();
    body.as_object_mut().unwrap().remove("customerName");
    body["bookingDate"] = json!("next tuesday");

    let (status, json) = send(
        &state,
        admin_request("POST", "/api/admin/bookings", Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Validation failed");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"customerName"));
    assert!(fields.contains(&"bookingDate"));

    let (_, list) = send(&state, admin_request("GET", "/api/admin/bookings", None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_booking_invalid_and_missing_ids() {
    let state = test_state();

    let (status, json) = send(
        &state,
        admin_request(
            "PATCH",
            "/api/admin/bookings/abc",
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid booking id");

    let (status, _) = send(
        &state,
        admin_request("DELETE", "/api/admin/bookings", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &state,
        admin_request(
            "PATCH",
            "/api/admin/bookings/999",
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &state,
        admin_request("DELETE", "/api/admin/bookings/999", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "booking not found");
}

#[tokio::test]
async fn test_booking_delete() {
    let state = test_state();
    let first = create_booking(&state).await;
    let second = create_booking(&state).await;

    let (status, json) = send(
        &state,
        admin_request("DELETE", &format!("/api/admin/bookings?id={first}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, list) = send(&state, admin_request("GET", "/api/admin/bookings", None)).await;
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second]);

    let (status, _) = send(
        &state,
        admin_request("DELETE", &format!("/api/admin/bookings/{first}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let state = test_state();
    let req = Request::builder()
        .method("POST")
        .uri("/api/admin/bookings")
        .header("Authorization", "Bearer test-token")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&state, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_unsupported_method() {
    let state = test_state();
    let (status, _) = send(
        &state,
        admin_request("PUT", "/api/admin/bookings", Some(priya_booking())),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_booking_stats() {
    let state = test_state();
    create_booking(&state).await;

    let (status, json) = send(
        &state,
        admin_request("GET", "/api/admin/bookings/stats", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pending"], 1);
    assert_eq!(json["completed"], 0);
    assert_eq!(json["revenue"], "0");
}

#[tokio::test]
async fn test_stats_overflow_leaves_service_usable() {
    let state = test_state();
    for _ in 0..2 {
        let mut body = priya_booking();
        body["status"] = json!("completed");
        body["price"] = json!("79228162514264337593543950335");
        let (status, _) = send(
            &state,
            admin_request("POST", "/api/admin/bookings", Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = send(
        &state,
        admin_request("GET", "/api/admin/bookings/stats", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal server error");

    let (status, list) = send(&state, admin_request("GET", "/api/admin/bookings", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

// ── Public site ──

#[tokio::test]
async fn test_public_booking_submission() {
    let state = test_state();
    let mut body = priya_booking();
    body["status"] = json!("confirmed");

    let (status, json) = send(&state, public_request("POST", "/api/bookings", Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Booking created successfully");
    assert_eq!(json["booking"]["status"], "pending");

    let (status, _) = send(
        &state,
        public_request("POST", "/api/bookings", Some(json!({"customerPhone": "1"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_services_hide_invisible() {
    let state = test_state();
    for (name, visible) in [("Bridal Makeup", true), ("Test Package", false)] {
        let (status, _) = send(
            &state,
            admin_request(
                "POST",
                "/api/admin/services",
                Some(json!({
                    "name": name,
                    "category": "beauty",
                    "type": "makeup",
                    "price": 12000,
                    "isVisible": visible
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = send(&state, public_request("GET", "/api/services", None)).await;
    assert_eq!(status, StatusCode::OK);
    let services = json.as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Bridal Makeup");
    assert_eq!(services[0]["price"], "12000");

    let (_, all) = send(&state, admin_request("GET", "/api/admin/services", None)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_testimonial_approval_flow() {
    let state = test_state();
    let (_, created) = send(
        &state,
        admin_request(
            "POST",
            "/api/admin/testimonials",
            Some(json!({"customerName": "Nadia", "text": "Beautiful work", "rating": 5})),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (_, public) = send(&state, public_request("GET", "/api/testimonials", None)).await;
    assert_eq!(public, json!([]));

    let (status, approved) = send(
        &state,
        admin_request(
            "PATCH",
            &format!("/api/admin/testimonials/{id}"),
            Some(json!({"isApproved": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["isApproved"], true);

    let (_, public) = send(&state, public_request("GET", "/api/testimonials", None)).await;
    assert_eq!(public.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_gallery_crud() {
    let state = test_state();
    let (status, item) = send(
        &state,
        admin_request(
            "POST",
            "/api/admin/gallery",
            Some(json!({"imageUrl": "/img/koi.jpg", "category": "tattoo", "tags": ["koi", "color"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["tags"], json!(["koi", "color"]));
    assert_eq!(item["isVisible"], true);
    let id = item["id"].as_i64().unwrap();

    let (status, hidden) = send(
        &state,
        admin_request(
            "PATCH",
            &format!("/api/admin/gallery/{id}"),
            Some(json!({"isVisible": false, "caption": "Koi half sleeve"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hidden["caption"], "Koi half sleeve");

    let (_, public) = send(&state, public_request("GET", "/api/gallery", None)).await;
    assert_eq!(public, json!([]));

    let (status, _) = send(
        &state,
        admin_request("DELETE", &format!("/api/admin/gallery/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_content_by_key_and_duplicates() {
    let state = test_state();
    let body = json!({
        "key": "hero_headline",
        "section": "hero",
        "englishText": "Ink & Glow",
        "banglaText": "কালি ও দীপ্তি"
    });

    let (status, _) = send(
        &state,
        admin_request("POST", "/api/admin/content", Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &state,
        admin_request("POST", "/api/admin/content", Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = send(
        &state,
        public_request("GET", "/api/content/hero_headline", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["englishText"], "Ink & Glow");

    let (status, _) = send(&state, public_request("GET", "/api/content/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_artist_and_customer_resources() {
    let state = test_state();

    let (status, artist) = send(
        &state,
        admin_request(
            "POST",
            "/api/admin/artists",
            Some(json!({"name": "Rafi", "specialty": "Realism", "email": "rafi@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(artist["rating"], "5.0");

    let (status, json) = send(
        &state,
        admin_request(
            "POST",
            "/api/admin/customers",
            Some(json!({"name": "Ayesha", "phone": "01700000000", "email": "not-an-email"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"][0]["field"], "email");

    let (status, customer) = send(
        &state,
        admin_request(
            "POST",
            "/api/admin/customers",
            Some(json!({"name": "Ayesha", "phone": "01700000000"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["loyaltyStatus"], "regular");
    assert_eq!(customer["totalBookings"], 0);
    assert_eq!(customer["lastVisit"], Value::Null);
}
