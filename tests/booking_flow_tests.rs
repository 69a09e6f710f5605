//! End-to-end guest flow: search, choose a room, enter details, see summary.

mod common;

use axum::http::StatusCode;
use bookings::api::AvailabilityResponse;
use bookings::db::BookingStore;
use bookings::models::DateRange;
use common::{body_text, location, spawn_app};

const GUEST: &str = "first_name=John&last_name=Smith&email=john%40smith.com&phone=555-555-5555";

#[tokio::test]
async fn test_public_pages_render() {
    let mut app = spawn_app().await;

    for uri in [
        "/",
        "/about",
        "/generals-quarters",
        "/majors-suite",
        "/contact",
        "/search-availability",
        "/user/login",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    }

    let response = app.get("/static/css/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/static/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_booking_flow() {
    let mut app = spawn_app().await;

    let response = app
        .post_form("/search-availability", "start=2050-01-01&end=2050-01-02")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("/choose-room/1"));
    assert!(html.contains("/choose-room/2"));

    let response = app.get("/choose-room/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/make-reservation");

    let response = app.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("2050-01-01"));
    assert!(html.contains("2050-01-02"));

    let response = app.post_form("/make-reservation", GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/reservation-summary");

    let response = app.get("/reservation-summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("John Smith"));
    assert!(html.contains("john@smith.com"));
    assert!(html.contains("2050-01-01"));

    // The summary is shown once.
    let response = app.get("/reservation-summary").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    assert_eq!(app.store.reservation_count().await, 1);
    assert_eq!(app.store.restriction_count().await, 1);

    let guest_mail = app.mail.try_recv().unwrap();
    assert_eq!(guest_mail.to, "john@smith.com");
    let owner_mail = app.mail.try_recv().unwrap();
    assert_eq!(owner_mail.to, "me@here.com");

    // Room 1 is now taken for that night; room 2 is still offered.
    let response = app
        .post_form("/search-availability", "start=2050-01-01&end=2050-01-02")
        .await;
    let html = body_text(response).await;
    assert!(!html.contains("/choose-room/1"));
    assert!(html.contains("/choose-room/2"));
}

#[tokio::test]
async fn test_invalid_guest_details_rerender_without_write() {
    let mut app = spawn_app().await;

    let response = app
        .get("/book-room?id=1&s=2050-01-01&e=2050-01-02")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/make-reservation");

    let response = app
        .post_form(
            "/make-reservation",
            "first_name=Jo&last_name=Smith&email=not-an-email&phone=",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("at least 3 characters"));
    assert!(html.contains("Invalid email address"));
    assert!(html.contains("value=\"Smith\""));

    assert_eq!(app.store.reservation_count().await, 0);

    // The draft survives, so a corrected submission goes through.
    let response = app.post_form("/make-reservation", GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/reservation-summary");
    assert_eq!(app.store.reservation_count().await, 1);
}

#[tokio::test]
async fn test_padded_first_name_is_measured_trimmed() {
    let mut app = spawn_app().await;
    app.get("/book-room?id=1&s=2050-01-01&e=2050-01-02").await;

    let response = app
        .post_form(
            "/make-reservation",
            "first_name=%20Jo%20&last_name=Smith&email=john%40smith.com&phone=",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("at least 3 characters"));
    assert_eq!(app.store.reservation_count().await, 0);
}

#[tokio::test]
async fn test_search_rejects_bad_dates() {
    let mut app = spawn_app().await;

    let response = app
        .post_form("/search-availability", "start=2050-01-02&end=2050-01-01")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");

    let html = body_text(app.get("/search-availability").await).await;
    assert!(html.contains("must be before"));

    let response = app
        .post_form("/search-availability", "start=garbage&end=2050-01-01")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");
}

#[tokio::test]
async fn test_search_without_availability_sets_error() {
    let mut app = spawn_app().await;
    let range = DateRange::parse("2050-03-01", "2050-03-05").unwrap();
    app.store.insert_block(1, range.start()).await.unwrap();
    app.store.insert_block(2, range.start()).await.unwrap();

    let response = app
        .post_form("/search-availability", "start=2050-03-01&end=2050-03-05")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");

    let html = body_text(app.get("/search-availability").await).await;
    assert!(html.contains("No availability"));

    // Shown once.
    let html = body_text(app.get("/search-availability").await).await;
    assert!(!html.contains("No availability"));
}

#[tokio::test]
async fn test_out_of_sequence_requests_redirect_home() {
    let mut app = spawn_app().await;

    for uri in ["/make-reservation", "/reservation-summary", "/choose-room/1"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&response), "/");
    }

    let response = app.post_form("/make-reservation", GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = body_text(app.get("/").await).await;
    assert!(html.contains("get reservation from session"));
    assert_eq!(app.store.reservation_count().await, 0);
}

#[tokio::test]
async fn test_unknown_room_is_rejected() {
    let mut app = spawn_app().await;

    let response = app
        .get("/book-room?id=99&s=2050-01-01&e=2050-01-02")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/book-room?id=abc&s=2050-01-01&e=2050-01-02").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_writer_failure_clears_draft() {
    let mut app = spawn_app().await;

    app.get("/book-room?id=1&s=2050-01-01&e=2050-01-02").await;
    app.store.fail_next_restriction_insert();

    let response = app.post_form("/make-reservation", GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    assert_eq!(app.store.reservation_count().await, 0);
    assert_eq!(app.store.restriction_count().await, 0);
    assert!(app.mail.try_recv().is_err());

    let response = app.get("/make-reservation").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_room_taken_between_choice_and_submit() {
    let mut app = spawn_app().await;

    app.get("/book-room?id=1&s=2050-01-01&e=2050-01-03").await;
    let date = DateRange::parse("2050-01-02", "2050-01-03").unwrap().start();
    app.store.insert_block(1, date).await.unwrap();

    let response = app.post_form("/make-reservation", GUEST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = body_text(app.get("/").await).await;
    assert!(html.contains("no longer available"));
    assert_eq!(app.store.reservation_count().await, 0);
}

async fn post_json(app: &mut common::TestApp, body: &str) -> AvailabilityResponse {
    let response = app.post_form("/search-availability-json", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_availability_json() {
    let mut app = spawn_app().await;

    let result = post_json(&mut app, "start=2050-01-01&end=2050-01-02&room_id=1").await;
    assert!(result.ok);
    assert_eq!(result.room_id, "1");
    assert_eq!(result.start_date, "2050-01-01");
    assert_eq!(result.end_date, "2050-01-02");

    let range = DateRange::parse("2050-01-01", "2050-01-02").unwrap();
    app.store.insert_block(1, range.start()).await.unwrap();

    let result = post_json(&mut app, "start=2050-01-01&end=2050-01-02&room_id=1").await;
    assert!(!result.ok);
    assert!(result.message.is_empty());

    // Adjacent stays do not overlap.
    let result = post_json(&mut app, "start=2050-01-02&end=2050-01-03&room_id=1").await;
    assert!(result.ok);
}

#[tokio::test]
async fn test_availability_json_malformed_input() {
    let mut app = spawn_app().await;

    let result = post_json(&mut app, "start=nope&end=2050-01-02&room_id=1").await;
    assert!(!result.ok);
    assert_eq!(result.message, "Error: Invalid start date");

    let result = post_json(&mut app, "start=2050-01-01&end=&room_id=1").await;
    assert_eq!(result.message, "Error: Invalid end date");

    let result = post_json(&mut app, "start=2050-01-01&end=2050-01-02&room_id=x").await;
    assert_eq!(result.message, "Error: Invalid room ID");

    let result = post_json(&mut app, "%%%").await;
    assert!(!result.ok);

    app.store.set_offline(true);
    let result = post_json(&mut app, "start=2050-01-01&end=2050-01-02&room_id=1").await;
    assert!(!result.ok);
    assert_eq!(result.message, "Error connecting to Database");
}

#[tokio::test]
async fn test_store_outage_is_recovered() {
    let mut app = spawn_app().await;
    app.store.set_offline(true);

    let response = app
        .post_form("/search-availability", "start=2050-01-01&end=2050-01-02")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/search-availability");

    app.store.set_offline(false);
    let html = body_text(app.get("/search-availability").await).await;
    assert!(html.contains("Something went wrong"));
}
