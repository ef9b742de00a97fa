mod common;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use common::{day, TestApp};
use hotel_backend::domain::models::room::{NewRoomParams, Room};
use hotel_backend::domain::ports::RoomRepository;
use serde_json::json;

const FAR_CHECK_OUT: &str = "9999-12-31";

fn nights_until_far_check_out() -> i64 {
    let tomorrow = Utc::now().date_naive() + chrono::Duration::days(1);
    let far = NaiveDate::parse_from_str(FAR_CHECK_OUT, "%Y-%m-%d").unwrap();
    (far - tomorrow).num_days()
}

#[tokio::test]
async fn test_booking_prices_whole_nights() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Halima", "halima@example.com").await;
    let room_id = app.create_room(&admin, "110", 4500).await;

    let (status, body) = app.send("POST", "/bookings", Some(&guest), Some(json!({
        "roomId": room_id,
        "checkInDate": day(3),
        "checkOutDate": day(6),
        "guestDetails": {
            "firstName": " Halima ",
            "lastName": "Ali",
            "adults": 2,
            "children": 1,
            "specialRequests": "Late arrival"
        }
    }))).await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Room booked successfully");
    let booking = &body["booking"];
    assert_eq!(booking["nights"], 3);
    assert_eq!(booking["totalCost"], 13500);
    assert_eq!(booking["status"], "CONFIRMED");
    assert_eq!(booking["customerId"], guest.user_id.as_str());
    assert_eq!(booking["roomId"], room_id.as_str());
    assert_eq!(booking["guestDetails"]["firstName"], "Halima");
    assert_eq!(booking["guestDetails"]["children"], 1);
    assert_eq!(booking["guestDetails"]["specialRequests"], "Late arrival");

    // Check-in at 14:00 and check-out at 11:00 hotel time (UTC here).
    let check_in = booking["checkInDate"].as_str().unwrap();
    let check_out = booking["checkOutDate"].as_str().unwrap();
    assert!(check_in.starts_with(&format!("{}T14:00:00", day(3))), "{}", check_in);
    assert!(check_out.starts_with(&format!("{}T11:00:00", day(6))), "{}", check_out);
}

#[tokio::test]
async fn test_quote_matches_booking() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Imani", "imani@example.com").await;
    let room_id = app.create_room(&admin, "120", 9900).await;

    let (status, body) = app.send(
        "GET",
        &format!("/rooms/{}/quote?checkIn={}&checkOut={}", room_id, day(1), day(5)),
        None,
        None,
    ).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let quote = body["quote"].clone();
    assert_eq!(quote["nights"], 4);
    assert_eq!(quote["totalCost"], 39600);

    let (status, body) = app.book(&guest, &room_id, &day(1), &day(5)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["nights"], quote["nights"]);
    assert_eq!(body["booking"]["totalCost"], quote["totalCost"]);
    assert_eq!(body["booking"]["checkInDate"], quote["checkInDate"]);
    assert_eq!(body["booking"]["checkOutDate"], quote["checkOutDate"]);
}

#[tokio::test]
async fn test_invalid_dates_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Zawadi", "zawadi@example.com").await;
    let room_id = app.create_room(&admin, "130", 5000).await;

    let (status, body) = app.book(&guest, &room_id, &day(-1), &day(2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Check-in date cannot be in the past");

    let (status, body) = app.book(&guest, &room_id, &day(3), &day(3)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Check-out date must be after check-in date");

    let (status, _) = app.book(&guest, &room_id, &day(4), &day(2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&guest, &room_id, "next tuesday", &day(2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(
        "GET",
        &format!("/rooms/{}/quote?checkIn={}&checkOut={}", room_id, day(2), day(1)),
        None,
        None,
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted and the room is still free.
    let (_, body) = app.send("GET", &format!("/rooms/{}", room_id), None, None).await;
    assert_eq!(body["room"]["status"], "AVAILABLE");
    let (_, body) = app.send("GET", &format!("/rooms/{}/bookings", room_id), Some(&admin), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_guest_details_are_required() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Neema", "neema@example.com").await;
    let room_id = app.create_room(&admin, "140", 5000).await;

    let (status, body) = app.send("POST", "/bookings", Some(&guest), Some(json!({
        "roomId": room_id,
        "checkInDate": day(1),
        "checkOutDate": day(2),
        "guestDetails": { "firstName": "", "lastName": "Doe", "adults": 1 }
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter guest details");

    let (status, _) = app.send("POST", "/bookings", Some(&guest), Some(json!({
        "roomId": room_id,
        "checkInDate": day(1),
        "checkOutDate": day(2),
        "guestDetails": { "firstName": "Jane", "lastName": "Doe", "adults": 0 }
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unavailable_or_missing_room() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Faraji", "faraji@example.com").await;
    let room_id = app.create_room(&admin, "150", 5000).await;

    let (status, _) = app.book(&guest, "no-such-room", &day(1), &day(2)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.book(&guest, &room_id, &day(1), &day(2)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.book(&guest, &room_id, &day(5), &day(7)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let cleaning_room = app.create_room(&admin, "151", 5000).await;
    app.send("POST", &format!("/rooms/{}/cleaning", cleaning_room), Some(&admin), None).await;
    let (status, _) = app.book(&guest, &cleaning_room, &day(1), &day(2)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("POST", "/bookings", None, Some(json!({
        "roomId": room_id, "checkInDate": day(1), "checkOutDate": day(2),
        "guestDetails": { "firstName": "A", "lastName": "B", "adults": 1 }
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_booking_visibility() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let owner = app.register("Jabari", "jabari@example.com").await;
    let stranger = app.register("Kito", "kito@example.com").await;
    let room_id = app.create_room(&admin, "160", 5000).await;

    let (_, body) = app.book(&owner, &room_id, &day(1), &day(2)).await;
    let booking_uri = format!("/bookings/{}", body["booking"]["id"].as_str().unwrap());

    let (status, _) = app.send("GET", &booking_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &booking_uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", &booking_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", "/bookings/unknown", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send("GET", "/bookings", Some(&owner), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
    let (_, body) = app.send("GET", "/bookings", Some(&stranger), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 0);

    let (status, _) = app.send("GET", &format!("/rooms/{}/bookings", room_id), Some(&owner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.send("GET", &format!("/rooms/{}/bookings", room_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_room_price_has_an_upper_bound() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (status, body) = app.send("POST", "/rooms", Some(&admin), Some(json!({
        "number": "900", "type": "Penthouse", "floor": 9, "guests": 4, "price": 10_000_000_000_000i64
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "validation");

    let (_, body) = app.send("GET", "/rooms", None, None).await;
    assert!(body["rooms"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_stay_total_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Baraka", "baraka@example.com").await;

    // Rows written before the price cap existed can still carry huge prices.
    let room = app.state.room_repo.create(&Room::new(NewRoomParams {
        number: "901".into(),
        room_type: "Legacy Suite".into(),
        floor: 9,
        guests: 2,
        price: 10_000_000_000_000,
    })).await.unwrap();

    let (status, body) = app.send(
        "GET",
        &format!("/rooms/{}/quote?checkIn={}&checkOut={}", room.id, day(1), FAR_CHECK_OUT),
        None,
        None,
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "Stay total is too large");

    let (status, body) = app.book(&guest, &room.id, &day(1), FAR_CHECK_OUT).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "Stay total is too large");

    let (_, body) = app.send("GET", &format!("/rooms/{}", room.id), None, None).await;
    assert_eq!(body["room"]["status"], "AVAILABLE");
    assert!(body["room"]["activeBooking"].is_null());

    let (_, body) = app.send("GET", &format!("/rooms/{}/bookings", room.id), Some(&admin), None).await;
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_very_long_stay_is_priced_exactly() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let guest = app.register("Zawadi", "zawadi@example.com").await;
    let room_id = app.create_room(&admin, "902", 100).await;
    let nights = nights_until_far_check_out();

    let (status, body) = app.send(
        "GET",
        &format!("/rooms/{}/quote?checkIn={}&checkOut={}", room_id, day(1), FAR_CHECK_OUT),
        None,
        None,
    ).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let quote = body["quote"].clone();
    assert_eq!(quote["nights"], nights);
    assert_eq!(quote["totalCost"], 100 * nights);

    let (status, body) = app.book(&guest, &room_id, &day(1), FAR_CHECK_OUT).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["booking"]["nights"], quote["nights"]);
    assert_eq!(body["booking"]["totalCost"], quote["totalCost"]);
    assert_eq!(body["room"]["status"], "BOOKED");
}
