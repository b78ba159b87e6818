mod common;

use cinema_booking::{
    domain::models::{auth::Role, movie::{Movie, NewMovieParams}, theatre::{NewTheatreParams, SlotAssignment, Theatre}},
    domain::ports::{MovieRepository, TheatreRepository},
    domain::services::ledger::{BookingLedger, CreateBookingCommand},
    error::AppError,
    infra::repositories::{
        postgres_booking_repo::PostgresBookingRepo,
        postgres_movie_repo::PostgresMovieRepo,
        postgres_theatre_repo::PostgresTheatreRepo,
    },
};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::TestApp;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

#[tokio::test]
async fn test_sqlite_concurrent_bookings_never_oversell() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let movie_id = app.create_movie(&admin, "Rush Hour").await;
    let theatre = app.create_theatre(&admin, &movie_id, &["7:00 PM"], Some(10)).await;
    let theatre_id = theatre["id"].as_str().unwrap().to_string();

    let mut set = JoinSet::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let token = app.token_for(&Uuid::new_v4().to_string(), Role::User);
        let uri = format!("/api/v1/bookings/book/{}/{}", movie_id, theatre_id);
        set.spawn(async move {
            use tower::ServiceExt;
            let req = axum::http::Request::builder()
                .method("POST")
                .uri(uri)
                .header(axum::http::header::COOKIE, format!("access_token={}", token))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(r#"{"show_timing":"7:00 PM","number_of_tickets":3}"#))
                .unwrap();
            router.oneshot(req).await.unwrap().status()
        });
    }

    let mut created = 0;
    let mut rejected = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => rejected += 1,
            other => panic!("Unexpected status {}", other),
        }
    }

    // 10 seats fit three bookings of 3.
    assert_eq!(created, 3);
    assert_eq!(rejected, 5);
    assert_eq!(app.available_seats(&theatre_id).await, 1);
}

#[tokio::test]
async fn test_sqlite_concurrent_cancels_release_seats_once() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let movie_id = app.create_movie(&admin, "Double Cancel").await;
    let theatre = app.create_theatre(&admin, &movie_id, &["7:00 PM"], Some(10)).await;
    let theatre_id = theatre["id"].as_str().unwrap().to_string();
    let owner = Uuid::new_v4().to_string();

    let booking = app.state.ledger.create_booking(CreateBookingCommand {
        user_id: owner.clone(),
        movie_id: movie_id.clone(),
        theatre_id: theatre_id.clone(),
        show_timing: "7:00 PM".into(),
        number_of_tickets: 4,
    }).await.unwrap();
    assert_eq!(app.available_seats(&theatre_id).await, 6);

    let mut set = JoinSet::new();
    for _ in 0..6 {
        let ledger = app.state.ledger.clone();
        let booking_id = booking.id.clone();
        let owner = owner.clone();
        set.spawn(async move { ledger.cancel_booking(&booking_id, &owner).await });
    }

    let mut cancelled = 0;
    let mut already = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(b) => {
                assert_eq!(b.status, "cancelled");
                cancelled += 1;
            }
            Err(AppError::AlreadyCancelled) => already += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(cancelled, 1);
    assert_eq!(already, 5);
    assert_eq!(app.available_seats(&theatre_id).await, 10);
}

#[tokio::test]
async fn test_postgres_slots_on_one_screen_keep_insertion_order() {
    let db_url = match std::env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            println!("Skipping slot ordering test (not targeting Postgres)");
            return;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .expect("Failed to connect to DB");
    sqlx::migrate!("./migrations/postgres").run(&pool).await.unwrap();

    let theatre_repo = PostgresTheatreRepo::new(pool.clone());
    let movies: Vec<String> = (0..4).map(|_| Uuid::new_v4().to_string()).collect();

    let theatre = Theatre::new(NewTheatreParams {
        name: format!("Order Hall {}", Uuid::new_v4()),
        location: "Sequence St".into(),
        number_of_screens: 1,
        assignments: movies.iter().map(|movie_id| SlotAssignment {
            movie_id: movie_id.clone(),
            screen_number: 1,
            show_timings: vec!["6:00 PM".into()],
            total_seats: None,
            available_seats: None,
        }).collect(),
    }).unwrap();
    let theatre = theatre_repo.create(&theatre).await.unwrap();

    let loaded = theatre_repo.find_by_id(&theatre.id).await.unwrap().unwrap();
    let order: Vec<String> = loaded.slots.iter().map(|s| s.movie_id.clone()).collect();
    assert_eq!(order, movies);
}

#[tokio::test]
async fn test_postgres_concurrent_bookings_consume_exactly_capacity() {
    let db_url = match std::env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            println!("Skipping concurrency test (not targeting Postgres)");
            return;
        }
    };

    let opts = PgConnectOptions::from_str(&db_url)
        .unwrap()
        .log_statements(tracing::log::LevelFilter::Debug);

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect_with(opts)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!("./migrations/postgres").run(&pool).await.unwrap();

    let movie_repo = Arc::new(PostgresMovieRepo::new(pool.clone()));
    let theatre_repo = Arc::new(PostgresTheatreRepo::new(pool.clone()));
    let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
    let ledger = Arc::new(BookingLedger::new(theatre_repo.clone(), booking_repo.clone()));

    let movie = Movie::new(NewMovieParams {
        name: "Concurrency Premiere".into(),
        genre: "Thriller".into(),
        language: "English".into(),
        duration: "1h 45m".into(),
        movie_image: None,
        cast: vec!["Racer One".into()],
        director: "Lock Holder".into(),
        release_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }).unwrap();
    let movie = movie_repo.create(&movie).await.unwrap();

    let capacity = 25;
    let theatre = Theatre::new(NewTheatreParams {
        name: format!("Race Hall {}", Uuid::new_v4()),
        location: "Contention Ave".into(),
        number_of_screens: 1,
        assignments: vec![SlotAssignment {
            movie_id: movie.id.clone(),
            screen_number: 1,
            show_timings: vec!["8:00 PM".into()],
            total_seats: Some(capacity),
            available_seats: None,
        }],
    }).unwrap();
    let theatre = theatre_repo.create(&theatre).await.unwrap();

    let mut set = JoinSet::new();
    for _ in 0..40 {
        let ledger = ledger.clone();
        let movie_id = movie.id.clone();
        let theatre_id = theatre.id.clone();
        set.spawn(async move {
            ledger.create_booking(CreateBookingCommand {
                user_id: Uuid::new_v4().to_string(),
                movie_id,
                theatre_id,
                show_timing: "8:00 PM".into(),
                number_of_tickets: 2,
            }).await
        });
    }

    let mut seats_taken = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(booking) => seats_taken += booking.number_of_tickets,
            Err(AppError::InsufficientSeats { .. }) => {}
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    let available: i32 = sqlx::query_scalar("SELECT available_seats FROM theatre_slots WHERE theatre_id = $1")
        .bind(&theatre.id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert!(seats_taken <= capacity);
    assert_eq!(available + seats_taken, capacity);
    // 25 seats in pairs leave a single seat unsellable.
    assert_eq!(available, 1);
}
