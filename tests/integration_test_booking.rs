mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_booking_books_seats_and_snapshots_price() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 20, 200.0).await;
    let (token, user_id) = app.register_user("Alice", "alice@cinema.test").await;

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1", "A2"]
    })).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    let booking_id = body["id"].as_str().unwrap().to_string();

    assert_eq!(body["total_price"], 400.0);
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["booking_status"], "confirmed");
    assert!(body["booking_code"].as_str().unwrap().starts_with("BOOK-"));
    assert_eq!(body["seats"].as_array().unwrap().len(), 2);
    assert_eq!(body["seats"][0]["seat_number"], "A1");
    assert_eq!(body["seats"][0]["row"], "A");

    let seat = app.seat_status(&showtime_id, "A1").await;
    assert_eq!(seat["status"], "booked");
    assert_eq!(seat["booked_by"], user_id);
    assert!(seat["locked_by"].is_null());

    // Raising the price afterwards must not rewrite existing bookings.
    let res = app.put(&format!("/api/v1/admin/showtimes/{}", showtime_id), Some(&admin), json!({
        "price": 500.0
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/bookings/{}", booking_id), Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["total_price"], 400.0);
}

#[tokio::test]
async fn test_booking_own_locked_seats_succeeds() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token, _) = app.register_user("Alice", "alice@cinema.test").await;

    let res = app.post("/api/v1/bookings/lock-seats", Some(&token), json!({
        "showtime_id": showtime_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_seat_locked_by_another_user_fails() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token1, _) = app.register_user("Alice", "alice@cinema.test").await;
    let (token2, _) = app.register_user("Bob", "bob@cinema.test").await;

    let res = app.post("/api/v1/bookings/lock-seats", Some(&token1), json!({
        "showtime_id": showtime_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post("/api/v1/bookings", Some(&token2), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("held by another user"));
}

#[tokio::test]
async fn test_booking_is_all_or_nothing() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token1, _) = app.register_user("Alice", "alice@cinema.test").await;
    let (token2, _) = app.register_user("Bob", "bob@cinema.test").await;

    app.book_seats(&token1, &showtime_id, &movie_id, &["A2"]).await;

    // A1 is free but A2 is already booked: the whole request fails and A1
    // stays untouched.
    let res = app.post("/api/v1/bookings", Some(&token2), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1", "A2"]
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let seat = app.seat_status(&showtime_id, "A1").await;
    assert_eq!(seat["status"], "available");
    assert!(seat["locked_by"].is_null());
    assert!(seat["booked_by"].is_null());
}

#[tokio::test]
async fn test_booking_unknown_seat_fails() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token, _) = app.register_user("Alice", "alice@cinema.test").await;

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["Z99"]
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("does not exist"));
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token, _) = app.register_user("Alice", "alice@cinema.test").await;

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": []
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": "missing",
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": "some-other-movie",
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_seat_numbers_collapse_to_one() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 200.0).await;
    let (token, _) = app.register_user("Alice", "alice@cinema.test").await;

    let res = app.post("/api/v1/bookings", Some(&token), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1", "A1"]
    })).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["seats"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_price"], 200.0);
}

#[tokio::test]
async fn test_two_seat_showtime_full_scenario() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 2, 200.0).await;
    let (token1, user1) = app.register_user("Alice", "alice@cinema.test").await;
    let (token2, _) = app.register_user("Bob", "bob@cinema.test").await;

    // Alice locks and books A1.
    let res = app.post("/api/v1/bookings/lock-seats", Some(&token1), json!({
        "showtime_id": showtime_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.seat_status(&showtime_id, "A1").await["status"], "locked");

    let res = app.post("/api/v1/bookings", Some(&token1), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let booking = parse_body(res).await;
    assert_eq!(booking["total_price"], 200.0);

    let seat = app.seat_status(&showtime_id, "A1").await;
    assert_eq!(seat["status"], "booked");
    assert_eq!(seat["booked_by"], user1);

    // Bob cannot book the same seat.
    let res = app.post("/api/v1/bookings", Some(&token2), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Alice cancels; the seat frees up and Bob's retry succeeds.
    let res = app.post(
        &format!("/api/v1/bookings/{}/cancel", booking["id"].as_str().unwrap()),
        Some(&token1),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.seat_status(&showtime_id, "A1").await["status"], "available");

    let res = app.post("/api/v1/bookings", Some(&token2), json!({
        "showtime_id": showtime_id,
        "movie_id": movie_id,
        "seats": ["A1"]
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_my_bookings_most_recent_first() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token, _) = app.register_user("Alice", "alice@cinema.test").await;

    let first = app.book_seats(&token, &showtime_id, &movie_id, &["A1"]).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.book_seats(&token, &showtime_id, &movie_id, &["A2"]).await;

    let res = app.get("/api/v1/bookings/mine", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let bookings = body.as_array().unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0]["id"], second.as_str());
    assert_eq!(bookings[1]["id"], first.as_str());
}

#[tokio::test]
async fn test_get_booking_restricted_to_owner_or_admin() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@cinema.test").await;
    let movie_id = app.create_movie(&admin).await;
    let showtime_id = app.create_showtime(&admin, &movie_id, 10, 100.0).await;
    let (token1, _) = app.register_user("Alice", "alice@cinema.test").await;
    let (token2, _) = app.register_user("Bob", "bob@cinema.test").await;

    let booking_id = app.book_seats(&token1, &showtime_id, &movie_id, &["A1"]).await;

    let res = app.get(&format!("/api/v1/bookings/{}", booking_id), Some(&token2)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.get(&format!("/api/v1/bookings/{}", booking_id), Some(&admin)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/bookings/{}", booking_id), Some(&token1)).await;
    assert_eq!(res.status(), StatusCode::OK);
}
