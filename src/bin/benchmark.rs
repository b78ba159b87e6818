use chrono::Utc;
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 10;
const SHOW_TIMING: &str = "7:30 PM";
const SLOT_SEATS: i64 = 500;

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    token: Option<String>,
    body: Option<Value>,
}

struct StageResult {
    booked: u64,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let admin_token = env::var("BENCH_ADMIN_TOKEN").expect("BENCH_ADMIN_TOKEN must be set (admin access token)");
    let user_token = env::var("BENCH_USER_TOKEN").expect("BENCH_USER_TOKEN must be set (user access token)");

    println!("{}", "🚀 Starting Booking Benchmark".bold().green());
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
    let movie_id = setup_movie(&client, &base_url, &admin_token).await;
    let theatre_id = setup_theatre(&client, &base_url, &admin_token, &movie_id).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Movie ID:   {}", movie_id);
    println!("   Theatre ID: {}", theatre_id);
    println!("   Seats:      {} at {}", SLOT_SEATS, SHOW_TIMING);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            token: None,
            body: None,
        },
        Target {
            name: "List Movies (Public Read)",
            method: "GET",
            url: format!("{}/api/v1/movies", base_url),
            token: None,
            body: None,
        },
        Target {
            name: "Book One Ticket (Seat Contention)",
            method: "POST",
            url: format!("{}/api/v1/bookings/book/{}/{}", base_url, movie_id, theatre_id),
            token: Some(user_token.clone()),
            body: Some(json!({ "show_timing": SHOW_TIMING, "number_of_tickets": 1 })),
        },
    ];

    let rps_stages = vec![10, 50, 200];
    let mut booked_total = 0;

    for target in targets {
        println!("\n{}", "=".repeat(72));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(72));

        println!("{:<10} | {:<15} | {:<15} | {:<15} | {:<8}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate", "Booked");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}-+-{:-<8}", "", "", "", "", "");

        for &rps in &rps_stages {
            let result = run_stage(&client, &target, rps).await;
            booked_total += result.booked;
        }
    }

    verify_seat_conservation(&client, &base_url, &admin_token, &theatre_id, booked_total).await;
}

async fn setup_movie(client: &Client, base_url: &str, admin_token: &str) -> String {
    let res = client.post(format!("{}/api/v1/movies", base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": format!("Benchmark Feature {}", &Uuid::new_v4().to_string()[..8]),
            "genre": "Drama",
            "language": "English",
            "duration": "2h 10m",
            "cast": ["Load Tester", "Seat Counter"],
            "director": "Bench Director",
            "release_date": Utc::now().date_naive(),
        }))
        .send()
        .await
        .expect("Failed to send movie create request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create movie. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse movie response");
    body["id"].as_str().expect("No movie id").to_string()
}

async fn setup_theatre(client: &Client, base_url: &str, admin_token: &str, movie_id: &str) -> String {
    let res = client.post(format!("{}/api/v1/theatres", base_url))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": "Benchmark Multiplex",
            "location": "Load Lane 1",
            "number_of_screens": 1,
            "slots": [{
                "movie_id": movie_id,
                "screen_number": 1,
                "show_timings": [SHOW_TIMING],
                "total_seats": SLOT_SEATS,
            }]
        }))
        .send()
        .await
        .expect("Failed to send theatre create request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create theatre. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.expect("Failed to parse theatre response");
    body["id"].as_str().expect("No theatre id").to_string()
}

fn build_request(client: &Client, method: &str, url: &str, token: Option<&str>, body: Option<&Value>) -> RequestBuilder {
    let mut req = match method {
        "POST" => client.post(url),
        _ => client.get(url),
    };
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    if let Some(body) = body {
        req = req.json(body);
    }
    req
}

async fn run_stage(client: &Client, target: &Target, rps: u32) -> StageResult {
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
            let req = build_request(client, target.method, &target.url, target.token.as_deref(), target.body.as_ref());
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = req.send().await;
                let latency = req_start.elapsed();

                let status = res.ok().map(|r| r.status());
                let _ = tx.send((latency, status)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut handled = 0;
    let mut booked = 0;
    let mut total = 0;

    while let Some((latency, status)) = rx.recv().await {
        total += 1;
        match status {
            Some(StatusCode::CREATED) => { handled += 1; booked += 1; }
            // Sold out is an expected answer under contention.
            Some(StatusCode::CONFLICT) => handled += 1,
            Some(s) if s.is_success() => handled += 1,
            _ => {}
        }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (handled as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}% | {:<8}",
        rps,
        mean_ms,
        p99_ms,
        success_rate,
        booked
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    StageResult { booked }
}

async fn verify_seat_conservation(client: &Client, base_url: &str, admin_token: &str, theatre_id: &str, booked: u64) {
    println!("\n{}", "🔎 Verifying seat conservation...".yellow());

    let res = client.get(format!("{}/api/v1/theatres/{}", base_url, theatre_id))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("Failed to fetch theatre");
    let body: Value = res.json().await.expect("Failed to parse theatre response");

    let available = body["slots"][0]["available_seats"].as_i64().expect("No available_seats");
    let expected = (SLOT_SEATS - booked as i64).max(0);

    println!("   Booked tickets:  {}", booked);
    println!("   Available seats: {} (expected {})", available, expected);

    if available == expected && booked as i64 <= SLOT_SEATS {
        println!("{}", "✅ Seats conserved, no overselling.".green().bold());
    } else {
        println!("{}", "❌ Seat counter drifted from confirmed bookings!".red().bold());
        std::process::exit(1);
    }
}
