use cinema_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::auth::{Claims, Role, TOKEN_AUDIENCE},
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_movie_repo::SqliteMovieRepo,
        sqlite_theatre_repo::SqliteTheatreRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_ISSUER: &str = "test-issuer";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: TEST_ISSUER.to_string(),
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteMovieRepo::new(pool.clone())),
            Arc::new(SqliteTheatreRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Signs an access token the way the identity provider would.
    pub fn token_for(&self, user_id: &str, role: Role) -> String {
        sign_token(user_id, role, TEST_ISSUER, TOKEN_AUDIENCE, 3600)
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&Uuid::new_v4().to_string(), Role::Admin)
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("access_token={}", token));
        }
        let body = match body {
            Some(b) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(b.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn create_movie(&self, admin_token: &str, name: &str) -> String {
        let res = self.send("POST", "/api/v1/movies", Some(admin_token), Some(json!({
            "name": name,
            "genre": "Drama",
            "language": "English",
            "duration": "2h 30m",
            "movie_image": null,
            "cast": ["Lead Actor", "Supporting Actor"],
            "director": "Some Director",
            "release_date": "2024-05-01"
        }))).await;
        assert_eq!(res.status(), 201, "movie creation failed");
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }

    /// Creates a theatre with one slot showing `movie_id` at the given timings.
    pub async fn create_theatre(&self, admin_token: &str, movie_id: &str, timings: &[&str], total_seats: Option<i32>) -> Value {
        let mut slot = json!({
            "movie_id": movie_id,
            "screen_number": 1,
            "show_timings": timings,
        });
        if let Some(seats) = total_seats {
            slot["total_seats"] = json!(seats);
        }

        let res = self.send("POST", "/api/v1/theatres", Some(admin_token), Some(json!({
            "name": "Grand Cinema",
            "location": "Main Street 1",
            "number_of_screens": 3,
            "slots": [slot]
        }))).await;
        assert_eq!(res.status(), 201, "theatre creation failed");
        parse_body(res).await
    }

    pub async fn book(&self, user_token: &str, movie_id: &str, theatre_id: &str, show_timing: &str, tickets: i32) -> Response {
        self.send(
            "POST",
            &format!("/api/v1/bookings/book/{}/{}", movie_id, theatre_id),
            Some(user_token),
            Some(json!({ "show_timing": show_timing, "number_of_tickets": tickets })),
        ).await
    }

    pub async fn cancel(&self, user_token: &str, booking_id: &str) -> Response {
        self.send("PUT", &format!("/api/v1/bookings/cancel/{}", booking_id), Some(user_token), None).await
    }

    pub async fn available_seats(&self, theatre_id: &str) -> i64 {
        sqlx::query_scalar("SELECT available_seats FROM theatre_slots WHERE theatre_id = ?")
            .bind(theatre_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub fn sign_token(user_id: &str, role: Role, issuer: &str, audience: &str, ttl_secs: i64) -> String {
    let priv_key_pem = include_str!("../tests/keys/test_private.pem");
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        iss: issuer.to_string(),
        sub: user_id.to_string(),
        aud: audience.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
        role,
    };
    let key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::EdDSA), &claims, &key).unwrap()
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
