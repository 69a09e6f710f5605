//! Login gate and the owner's reservation back office.

mod common;

use axum::http::StatusCode;
use bookings::api::AuthenticatedUser;
use bookings::db::BookingStore;
use bookings::models::{DateRange, GuestDetails, NewReservation};
use chrono::{Datelike, NaiveDate};
use common::{TestApp, body_text, location, spawn_app};

async fn seed_reservation(app: &TestApp, room_id: i32, start: NaiveDate, nights: u64) -> i32 {
    let end = start + chrono::Days::new(nights);
    app.store
        .create_reservation(&NewReservation {
            guest: GuestDetails {
                first_name: "John".to_string(),
                last_name: "Smith".to_string(),
                email: "john@smith.com".to_string(),
                phone: "555".to_string(),
            },
            room_id,
            range: DateRange::new(start, end).unwrap(),
        })
        .await
        .unwrap()
}

fn next_year_date(month: u32, day: u32) -> NaiveDate {
    let year = chrono::Utc::now().year() + 1;
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_admin_requires_login() {
    let mut app = spawn_app().await;

    for uri in [
        "/admin/dashboard",
        "/admin/reservations-new",
        "/admin/reservations-all",
        "/admin/reservations-calendar",
        "/admin/reservations/all/1/show",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&response), "/user/login");
    }

    let html = body_text(app.get("/user/login").await).await;
    assert!(html.contains("Log in first!"));
}

#[tokio::test]
async fn test_login_and_logout() {
    let mut app = spawn_app().await;

    let response = app
        .post_form("/user/login", "email=admin%40example.com&password=wrong")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
    let html = body_text(app.get("/user/login").await).await;
    assert!(html.contains("Invalid login credentials"));

    let response = app.post_form("/user/login", "email=nope&password=").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Invalid email address"));
    assert!(html.contains("This field cannot be blank"));

    app.login().await;

    let response = app.get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(matches!(
        response.extensions().get::<AuthenticatedUser>(),
        Some(AuthenticatedUser(id)) if *id > 0
    ));
    let html = body_text(response).await;
    assert!(html.contains("Logged in successfully"));
    assert!(html.contains("/user/logout"));

    let response = app.get("/user/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    let response = app.get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
    assert!(response.extensions().get::<AuthenticatedUser>().is_none());
}

#[tokio::test]
async fn test_reservation_lists_and_processing() {
    let mut app = spawn_app().await;
    let id = seed_reservation(&app, 1, next_year_date(2, 1), 2).await;
    app.login().await;

    let html = body_text(app.get("/admin/dashboard").await).await;
    assert!(html.contains("New reservations: 1"));

    let response = app.get("/admin/reservations-new").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(&format!("/admin/reservations/new/{id}/show")));
    assert!(html.contains("Smith"));

    let response = app.get(&format!("/admin/reservations/new/{id}/show")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("value=\"john@smith.com\""));

    let response = app
        .get(&format!("/admin/process-reservation/new/{id}"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/reservations-new");

    assert!(app.store.all_new_reservations().await.unwrap().is_empty());
    assert!(app.store.get_reservation_by_id(id).await.unwrap().processed);

    let html = body_text(app.get("/admin/reservations-all").await).await;
    assert!(html.contains(&format!("/admin/reservations/all/{id}/show")));
}

#[tokio::test]
async fn test_update_reservation() {
    let mut app = spawn_app().await;
    let id = seed_reservation(&app, 1, next_year_date(3, 10), 1).await;
    app.login().await;

    let response = app
        .post_form(
            &format!("/admin/reservations/all/{id}"),
            "first_name=Jane&last_name=Doe&email=jane%40doe.com&phone=123",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/reservations-all");

    let reservation = app.store.get_reservation_by_id(id).await.unwrap();
    assert_eq!(reservation.first_name, "Jane");
    assert_eq!(reservation.email, "jane@doe.com");

    let response = app
        .post_form(
            &format!("/admin/reservations/all/{id}"),
            "first_name=J&last_name=Doe&email=jane%40doe.com&phone=123",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let reservation = app.store.get_reservation_by_id(id).await.unwrap();
    assert_eq!(reservation.first_name, "Jane");

    // Calendar source returns to the reservation's month.
    let start = next_year_date(3, 10);
    let response = app
        .post_form(
            &format!("/admin/reservations/cal/{id}"),
            "first_name=Janet&last_name=Doe&email=jane%40doe.com&phone=123",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/admin/reservations-calendar?y={}&m=3", start.year())
    );
}

#[tokio::test]
async fn test_delete_reservation_frees_room() {
    let mut app = spawn_app().await;
    let start = next_year_date(4, 1);
    let id = seed_reservation(&app, 2, start, 3).await;
    assert_eq!(app.store.restriction_count().await, 1);
    app.login().await;

    let response = app
        .get(&format!("/admin/delete-reservation/all/{id}"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/reservations-all");

    assert_eq!(app.store.reservation_count().await, 0);
    assert_eq!(app.store.restriction_count().await, 0);

    let range = DateRange::new(start, start + chrono::Days::new(3)).unwrap();
    assert!(app.store.room_is_available(2, &range).await.unwrap());

    // Unknown ids are reported, not fatal.
    let response = app.get("/admin/delete-reservation/all/999").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");

    let response = app.get("/admin/reservations/bogus/1/show").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_calendar_blocks() {
    let mut app = spawn_app().await;
    let reserved = next_year_date(5, 3);
    let id = seed_reservation(&app, 1, reserved, 2).await;
    let year = reserved.year();
    app.login().await;

    let response = app
        .get(&format!("/admin/reservations-calendar?y={year}&m=5"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(&format!("May {year}")));
    assert!(html.contains(&format!("/admin/reservations/cal/{id}/show")));
    assert!(html.contains(&format!("add_block_2_{year}-05-10")));

    let response = app
        .post_form(
            "/admin/reservations-calendar",
            &format!("y={year}&m=5&add_block_2_{year}-05-10=1&add_block_1_{year}-05-03=1"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/admin/reservations-calendar?y={year}&m=5")
    );

    // The block on the reserved night is rejected, the free one is kept.
    let html = body_text(app.get(&location(&response).to_string()).await).await;
    assert!(html.contains("no longer available"));

    let day = NaiveDate::from_ymd_opt(year, 5, 10).unwrap();
    let blocks = app
        .store
        .restrictions_for_room_by_date(2, &DateRange::single_day(day).unwrap())
        .await
        .unwrap();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].reservation_id.is_none());

    let response = app
        .post_form(
            "/admin/reservations-calendar",
            &format!("y={year}&m=5&remove_block_2_{year}-05-10={}", blocks[0].id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.store.restriction_count().await, 1);

    for query in ["y=1900&m=1", "y=-2147483648&m=1", "y=2147483647&m=12"] {
        let response = app
            .get(&format!("/admin/reservations-calendar?{query}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{query}");
        assert_eq!(location(&response), "/admin/dashboard");
    }
}
