use hotel_backend::{
    api::router::create_router,
    config::Config,
    infra::{database::Database, factory::{build_state, seed_admin}},
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@hotel.test";
pub const ADMIN_PASSWORD: &str = "admin-secret";

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub database: Database,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let database = Database::connect(&db_url)
            .await
            .expect("Failed to connect to test db");

        database.migrate()
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            hotel_timezone: chrono_tz::UTC,
            avatar_base_url: "https://avatars.test/svg".to_string(),
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        };

        let state = build_state(&config, &database);
        seed_admin(&state).await.expect("Failed to seed admin");

        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            database,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, attaching the session cookie and CSRF header when given.
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn register(&self, first_name: &str, email: &str) -> AuthHeaders {
        let payload = json!({
            "firstName": first_name,
            "lastName": "Guest",
            "gender": "female",
            "emailAddress": email,
            "password": "secret123",
            "passwordConfirm": "secret123"
        });
        self.authenticate("/auth/join", payload, StatusCode::CREATED).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = json!({ "emailAddress": email, "password": password });
        self.authenticate("/auth/login", payload, StatusCode::OK).await
    }

    pub async fn admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    async fn authenticate(&self, uri: &str, payload: Value, expected: StatusCode) -> AuthHeaders {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if response.status() != expected {
            panic!("{} failed in test helper: status {}", uri, response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token = cookie_value(&cookies, "access_token").expect("No access_token cookie returned");
        let refresh_token = cookie_value(&cookies, "refresh_token").expect("No refresh_token cookie returned");

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrfToken"].as_str().expect("No csrfToken in body").to_string();
        let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

        AuthHeaders {
            access_token,
            refresh_token,
            csrf_token,
            user_id,
        }
    }

    pub async fn create_room(&self, admin: &AuthHeaders, number: &str, price: i64) -> String {
        let (status, body) = self.send("POST", "/rooms", Some(admin), Some(json!({
            "number": number,
            "type": "Deluxe",
            "floor": 2,
            "guests": 2,
            "price": price
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "room creation failed: {}", body);
        body["room"]["id"].as_str().unwrap().to_string()
    }

    pub async fn book(&self, guest: &AuthHeaders, room_id: &str, check_in: &str, check_out: &str) -> (StatusCode, Value) {
        self.send("POST", "/bookings", Some(guest), Some(json!({
            "roomId": room_id,
            "checkInDate": check_in,
            "checkOutDate": check_out,
            "guestDetails": { "firstName": "Jane", "lastName": "Doe", "adults": 2, "children": 0 }
        }))).await
    }
}

/// Hotel-local calendar date `offset` days from today (the test hotel runs on UTC).
#[allow(dead_code)]
pub fn day(offset: i64) -> String {
    (Utc::now().date_naive() + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter().find(|c| c.starts_with(&prefix))?;
    let rest = &cookie[prefix.len()..];
    let end = rest.find(';').unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.db_filename, suffix));
        }
    }
}
