mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{session_id, TestApp, MORNING};
use serde_json::json;
use tower::ServiceExt;

use courtly_core::payment::PaymentStatus;

fn court_ids(body: &serde_json::Value) -> Vec<String> {
    body["courts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

async fn checkout(app: &TestApp, court: &str, slots: &[&str]) -> String {
    let (status, body) = app
        .post_json(
            "/checkout-session",
            &json!({ "date": "2025-06-01", "timeslots": slots, "courtId": court }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["url"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_on_both_prefixes() {
    let app = TestApp::at(MORNING);

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (status, _) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_timeslot_catalog() {
    let app = TestApp::at(MORNING);
    let (status, body) = app.get("/api/timeslots").await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["timeslots"].as_array().unwrap();
    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0], json!({ "id": "08:00-09:00", "label": "08:00 - 09:00" }));
    assert_eq!(slots[13]["id"], "21:00-22:00");
}

#[tokio::test]
async fn test_courts_without_filter_lists_catalog() {
    let app = TestApp::at(MORNING);
    let (status, body) = app.get("/courts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(court_ids(&body), vec!["court-1", "court-2", "court-3", "court-4"]);
    assert_eq!(body["courts"][0], json!({ "id": "court-1", "name": "Court 1" }));
}

#[tokio::test]
async fn test_checkout_confirm_and_availability() {
    let app = TestApp::at(MORNING);

    let url = checkout(&app, "court-2", &["08:00-09:00"]).await;
    assert!(url.starts_with(
        "http://localhost:3000/success?date=2025-06-01&timeslots=08%3A00-09%3A00&court=court-2&session_id=cs_mock_"
    ));

    let (status, body) = app.get(&format!("/confirm?session_id={}", session_id(&url))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(app.reservations.len(), 1);

    let (_, body) = app.get("/courts?date=2025-06-01&timeslots=08:00-09:00").await;
    assert_eq!(court_ids(&body), vec!["court-1", "court-3", "court-4"]);

    // Single-slot alias and other slots are unaffected.
    let (_, body) = app.get("/api/courts?date=2025-06-01&timeslot=08:00-09:00").await;
    assert_eq!(court_ids(&body), vec!["court-1", "court-3", "court-4"]);
    let (_, body) = app.get("/courts?date=2025-06-01&timeslots=09:00-10:00").await;
    assert_eq!(court_ids(&body).len(), 4);
}

#[tokio::test]
async fn test_second_confirmation_is_a_conflict() {
    let app = TestApp::at(MORNING);
    let first = checkout(&app, "court-1", &["10:00-11:00", "11:00-12:00"]).await;
    let second = checkout(&app, "court-1", &["11:00-12:00"]).await;

    let (_, body) = app.get(&format!("/api/confirm?session_id={}", session_id(&first))).await;
    assert_eq!(body["ok"], true);

    let (status, body) = app.get(&format!("/api/confirm?session_id={}", session_id(&second))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": false, "error": "one or more selected slots already reserved" }));
    assert_eq!(app.reservations.len(), 2);
}

#[tokio::test]
async fn test_concurrent_confirmations_single_winner() {
    let app = TestApp::at(MORNING);
    let a = checkout(&app, "court-4", &["15:00-16:00"]).await;
    let b = checkout(&app, "court-4", &["15:00-16:00"]).await;

    let uri_a = format!("/confirm?session_id={}", session_id(&a));
    let uri_b = format!("/confirm?session_id={}", session_id(&b));
    let ((_, ra), (_, rb)) = tokio::join!(app.get(&uri_a), app.get(&uri_b));

    let winners = [&ra, &rb].iter().filter(|r| r["ok"] == true).count();
    assert_eq!(winners, 1);
    assert_eq!(app.reservations.len(), 1);
}

#[tokio::test]
async fn test_confirm_rejections() {
    let app = TestApp::at(MORNING);

    let (status, body) = app.get("/confirm").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "error": "missing session_id" }));

    let (status, body) = app.get("/confirm?session_id=cs_unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);

    let url = checkout(&app, "court-3", &["12:00-13:00"]).await;
    let id = session_id(&url);
    app.provider.set_payment_status(&id, PaymentStatus::Unpaid);
    let (status, body) = app.get(&format!("/confirm?session_id={}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": false, "error": "payment not completed" }));
    assert!(app.reservations.is_empty());
}

#[tokio::test]
async fn test_checkout_validation_errors() {
    let app = TestApp::at(MORNING);

    let cases = [
        (json!({ "date": "2025-06-01", "timeslots": ["08:00-09:00"] }), "missing courtId"),
        (json!({ "date": "2025-06-01", "courtId": "court-1" }), "missing timeslots"),
        (json!({ "timeslots": ["08:00-09:00"], "courtId": "court-1" }), "missing date"),
        (
            json!({ "date": "2025-06-01", "timeslots": ["22:00-23:00"], "courtId": "court-1" }),
            "unknown timeslot \"22:00-23:00\"",
        ),
    ];
    for (body, expected) in cases {
        let (status, response) = app.post_json("/checkout-session", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"], expected);
    }

    let (status, response) = app.post_raw("/checkout-session", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid body");
}

#[tokio::test]
async fn test_checkout_legacy_inputs() {
    let app = TestApp::at(MORNING);
    let (status, body) = app
        .post_json(
            "/checkout-session?court=court-3",
            &json!({ "date": "2025-06-01", "timeslotId": "13:00-14:00" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap();
    assert!(url.contains("timeslots=13%3A00-14%3A00&court=court-3"));
}

#[tokio::test]
async fn test_checkout_unknown_court_is_rejected() {
    let app = TestApp::at(MORNING);
    let (status, body) = app
        .post_json(
            "/checkout-session",
            &json!({ "date": "2025-06-01", "timeslots": ["08:00-09:00"], "courtId": "court-99" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown court \"court-99\"");
}

#[tokio::test]
async fn test_checkout_court_cannot_inject_query_params() {
    let app = TestApp::at(MORNING);
    let (status, body) = app
        .post_json(
            "/checkout-session",
            &json!({ "date": "2025-06-01", "timeslots": ["08:00-09:00"], "courtId": "court-1&date=1999-01-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown court \"court-1&date=1999-01-01\"");

    let url = checkout(&app, "court-1", &["08:00-09:00", "09:00-10:00"]).await;
    let query = url.split_once('?').unwrap().1;
    let keys: Vec<&str> = query.split('&').map(|pair| pair.split('=').next().unwrap()).collect();
    assert_eq!(keys, vec!["date", "timeslots", "court", "session_id"]);
    assert!(query.contains("timeslots=08%3A00-09%3A00%2C09%3A00-10%3A00"));
}

#[tokio::test]
async fn test_underscore_aliases() {
    let app = TestApp::at(MORNING);

    let (status, body) = app
        .post_json(
            "/api/create_checkout_session",
            &json!({ "date": "2025-06-01", "timeslots": ["10:00-11:00"], "courtId": "court-4" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["url"].as_str().unwrap().contains("court=court-4"));

    let (status, body) = app
        .post_json("/create_checkout_session", &json!({ "date": "2025-06-01", "courtId": "court-4" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing timeslots");

    let (status, body) = app
        .post_json("/api/process_payment", &card_payment(&["11:00-12:00"], "Jane Doe"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .post_json("/process_payment", &card_payment(&["11:00-12:00"], "John Roe"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "one or more selected slots already reserved");
    assert_eq!(app.reservations.len(), 1);
}

#[tokio::test]
async fn test_checkout_inside_cutoff_is_rejected() {
    let app = TestApp::at("2025-06-01T07:45:00+07:00");
    let (status, body) = app
        .post_json(
            "/checkout-session",
            &json!({ "date": "2025-06-01", "timeslots": ["08:00-09:00"], "courtId": "court-1" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot book a past/soon timeslot");
}

#[tokio::test]
async fn test_now_reports_venue_time() {
    let app = TestApp::at(MORNING);
    let (status, body) = app.get("/now").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "nowUnixMs": 1_748_736_000_000i64,
            "nowISO": "2025-06-01T07:00:00+07:00",
            "timezone": "Asia/Jakarta",
            "utcOffsetMinutes": 420
        })
    );
}

fn card_payment(slots: &[&str], card_name: &str) -> serde_json::Value {
    json!({
        "date": "2025-06-01",
        "timeslots": slots,
        "courtId": "court-1",
        "amount": 50000 * slots.len(),
        "cardNumber": "4242 4242 4242 4242",
        "cardName": card_name,
        "expiryMonth": "12",
        "expiryYear": "2030",
        "cvv": "123"
    })
}

#[tokio::test]
async fn test_process_payment_books_slots() {
    let app = TestApp::at(MORNING);

    let (status, body) = app
        .post_json("/api/process-payment", &card_payment(&["16:00-17:00", "17:00-18:00"], "Jane Doe"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["bookingId"].as_str().unwrap().starts_with("BK-1748736000000-"));
    assert!(body.get("error").is_none());
    assert_eq!(app.reservations.len(), 2);

    let (status, body) = app
        .post_json("/api/process-payment", &card_payment(&["17:00-18:00"], "John Roe"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "one or more selected slots already reserved");

    let (_, body) = app.get("/courts?date=2025-06-01&timeslots=16:00-17:00").await;
    assert_eq!(court_ids(&body), vec!["court-2", "court-3", "court-4"]);
}

#[tokio::test]
async fn test_process_payment_rejections() {
    let app = TestApp::at(MORNING);

    let mut missing_cvv = card_payment(&["16:00-17:00"], "Jane Doe");
    missing_cvv["cvv"] = json!("");
    let (status, body) = app.post_json("/process-payment", &missing_cvv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "missing card details" }));

    let (status, body) = app.post_json("/process-payment", &card_payment(&[], "Jane Doe")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing booking details");

    let (status, body) = app.post_raw("/process-payment", "{\"date\":".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid body");

    let mut unknown_court = card_payment(&["16:00-17:00"], "Jane Doe");
    unknown_court["courtId"] = json!("court-99");
    let (status, body) = app.post_json("/process-payment", &unknown_court).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "unknown court \"court-99\"" }));
    assert!(app.reservations.is_empty());
}

#[tokio::test]
async fn test_process_payment_inside_cutoff() {
    let app = TestApp::at("2025-06-01T07:45:00+07:00");
    let (status, body) = app.post_json("/process-payment", &card_payment(&["08:00-09:00"], "Jane Doe")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "error": "cannot book a past/soon timeslot" }));
    assert!(app.reservations.is_empty());
}

#[tokio::test]
async fn test_reservation_lookup_by_booking_id() {
    let app = TestApp::at(MORNING);
    let (_, body) = app
        .post_json("/process-payment", &card_payment(&["20:00-21:00", "19:00-20:00"], "Jane Doe"))
        .await;
    let booking_id = body["bookingId"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/reservations?paymentRef={}", booking_id)).await;
    assert_eq!(status, StatusCode::OK);
    let reservations = body["reservations"].as_array().unwrap();
    assert_eq!(reservations.len(), 2);
    assert_eq!(reservations[0]["timeslotId"], "19:00-20:00");
    assert_eq!(reservations[1]["timeslotId"], "20:00-21:00");
    assert_eq!(reservations[0]["courtId"], "court-1");
    assert_eq!(reservations[0]["status"], "paid");
    assert_eq!(reservations[0]["paymentRef"], booking_id.as_str());
    assert_eq!(reservations[0]["createdAt"], 1_748_736_000);

    let id = reservations[1]["id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/reservations/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, reservations[1]);

    let (status, _) = app.get("/reservations/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/reservations/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reservation_lookup_by_session_id() {
    let app = TestApp::at(MORNING);
    let url = checkout(&app, "court-3", &["18:00-19:00"]).await;
    let session = session_id(&url);
    app.get(&format!("/confirm?session_id={}", session)).await;

    let (status, body) = app.get(&format!("/reservations?paymentRef={}", session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservations"][0]["courtId"], "court-3");
    assert_eq!(body["reservations"][0]["timeslotId"], "18:00-19:00");

    let (status, body) = app.get("/reservations?paymentRef=BK-0-000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no reservations for BK-0-000000");

    let (status, body) = app.get("/reservations").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing paymentRef");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::at(MORNING);
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/checkout-session")
                .header(header::ORIGIN, "https://courts.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
