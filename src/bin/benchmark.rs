use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;

struct Session {
    cookie: String,
    csrf_token: String,
}

struct Target {
    name: &'static str,
    method: Method,
    url: String,
    body: Option<Value>,
    authenticated: bool,
    /// Lost compare-and-swap races are expected under load and count as handled.
    conflict_ok: bool,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let admin_email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@hotel.local".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let session = login(&client, &base_url, &admin_email, &admin_password).await;
    let room_id = setup_room(&client, &base_url, &session).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Room ID: {}", room_id);

    let check_in = (Utc::now() + ChronoDuration::days(7)).format("%Y-%m-%d");
    let check_out = (Utc::now() + ChronoDuration::days(10)).format("%Y-%m-%d");

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: Method::GET,
            url: format!("{}/health", base_url),
            body: None,
            authenticated: false,
            conflict_ok: false,
        },
        Target {
            name: "List Rooms (Public Read)",
            method: Method::GET,
            url: format!("{}/rooms", base_url),
            body: None,
            authenticated: false,
            conflict_ok: false,
        },
        Target {
            name: "Stay Quote (Date Validation)",
            method: Method::GET,
            url: format!("{}/rooms/{}/quote?checkIn={}&checkOut={}", base_url, room_id, check_in, check_out),
            body: None,
            authenticated: false,
            conflict_ok: false,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: Method::POST,
            url: format!("{}/auth/login", base_url),
            body: Some(json!({ "emailAddress": admin_email, "password": admin_password })),
            authenticated: false,
            conflict_ok: false,
        },
        Target {
            name: "Start Cleaning (Conditional Write)",
            method: Method::POST,
            url: format!("{}/rooms/{}/cleaning", base_url, room_id),
            body: None,
            authenticated: true,
            conflict_ok: true,
        },
        Target {
            name: "Complete Cleaning (Conditional Write)",
            method: Method::DELETE,
            url: format!("{}/rooms/{}/cleaning", base_url, room_id),
            body: None,
            authenticated: true,
            conflict_ok: true,
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];
    let session = Arc::new(session);

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, &session, rps).await;
        }
    }
}

async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> Session {
    let res = client.post(format!("{}/auth/login", base_url))
        .json(&json!({ "emailAddress": email, "password": password }))
        .send()
        .await
        .expect("Login failed during setup");

    if !res.status().is_success() {
        panic!("Admin login failed (set ADMIN_EMAIL / ADMIN_PASSWORD). Status: {}", res.status());
    }

    // The session cookie is Secure, so it is forwarded by hand over plain HTTP.
    let access_token = res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with("access_token="))
        .and_then(|c| c.split(';').next())
        .expect("No access_token cookie")
        .to_string();

    let body: Value = res.json().await.unwrap();
    let csrf_token = body["csrfToken"].as_str().expect("No csrfToken").to_string();

    Session { cookie: access_token, csrf_token }
}

async fn setup_room(client: &Client, base_url: &str, session: &Session) -> String {
    let number = format!("B-{}", &Uuid::new_v4().to_string()[..8]);
    let res = client.post(format!("{}/rooms", base_url))
        .header(reqwest::header::COOKIE, &session.cookie)
        .header("X-CSRF-Token", &session.csrf_token)
        .json(&json!({
            "number": number,
            "type": "Benchmark Suite",
            "floor": 9,
            "guests": 2,
            "price": 12000
        }))
        .send()
        .await
        .expect("Failed to create room");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create room. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.unwrap();
    body["room"]["id"].as_str().expect("No room id").to_string()
}

async fn run_stage(client: &Client, target: &Target, session: &Arc<Session>, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method.clone();
            let session = target.authenticated.then(|| session.clone());
            let conflict_ok = target.conflict_ok;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let mut req = client.request(method, &url);
                if let Some(session) = &session {
                    req = req
                        .header(reqwest::header::COOKIE, &session.cookie)
                        .header("X-CSRF-Token", &session.csrf_token);
                }
                if let Some(b) = body {
                    req = req.json(&b);
                }
                let res = req.send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success() || (conflict_ok && r.status() == StatusCode::CONFLICT),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
