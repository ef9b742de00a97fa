mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{day, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_concurrent_bookings_have_one_winner() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Rehema", "rehema@example.com").await;
    let room_id = app.create_room(&admin, "900", 5000).await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let router = app.router.clone();
        let payload = json!({
            "roomId": room_id,
            "checkInDate": day(1),
            "checkOutDate": day(3),
            "guestDetails": { "firstName": "Jane", "lastName": "Doe", "adults": 1 }
        });
        let cookie = format!("access_token={}", guest.access_token);
        let csrf = guest.csrf_token.clone();

        handles.push(tokio::spawn(async move {
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header(header::COOKIE, cookie)
                    .header("X-CSRF-Token", csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap()
            ).await.unwrap().status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => {}
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);

    // Losers left no orphaned booking rows behind.
    let (_, body) = app.send("GET", &format!("/rooms/{}/bookings", room_id), Some(&admin), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    let (_, body) = app.send("GET", &format!("/rooms/{}", room_id), None, None).await;
    assert_eq!(body["room"]["status"], "BOOKED");
    assert_eq!(body["room"]["activeBooking"], first_booking_id(&app, &admin, &room_id).await.as_str());
}

async fn first_booking_id(app: &TestApp, admin: &common::AuthHeaders, room_id: &str) -> String {
    let (_, body) = app.send("GET", &format!("/rooms/{}/bookings", room_id), Some(admin), None).await;
    body["bookings"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_concurrent_cleaning_toggles_leave_a_valid_state() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let room_id = app.create_room(&admin, "901", 5000).await;
    let uri = format!("/rooms/{}/cleaning", room_id);

    let mut handles = Vec::new();
    for i in 0..8 {
        let router = app.router.clone();
        let uri = uri.clone();
        let cookie = format!("access_token={}", admin.access_token);
        let csrf = admin.csrf_token.clone();
        let method = if i % 2 == 0 { "POST" } else { "DELETE" };

        handles.push(tokio::spawn(async move {
            router.oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::COOKIE, cookie)
                    .header("X-CSRF-Token", csrf)
                    .body(Body::empty())
                    .unwrap()
            ).await.unwrap().status()
        }));
    }

    for handle in handles {
        let status = handle.await.unwrap();
        assert!(
            status == StatusCode::OK || status == StatusCode::CONFLICT,
            "unexpected status {}",
            status
        );
    }

    let (status, body) = app.send("GET", &format!("/rooms/{}", room_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let current = body["room"]["status"].as_str().unwrap();
    assert!(current == "AVAILABLE" || current == "CLEANING", "{}", current);
    assert_eq!(body["room"]["secondaryStatus"], "NONE");
}
