// tests/common/mod.rs

#![allow(dead_code)]

use std::net::SocketAddr;

use ai_assessment::{
    config::Config,
    engine::{PAYLOAD_VERSION, session::{Session, Step}},
    models::{caller::Caller, payload::AttemptPayload},
    routes,
    state::AppState,
    store::{self, Dialect},
    utils::jwt::sign_jwt,
};
use rand::{SeedableRng, rngs::StdRng};
use sqlx::{AnyPool, any::AnyPoolOptions};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";
pub const USER_AGENT: &str = "assessment-tests/1.0";

pub struct TestApp {
    pub address: String,
    pub pool: AnyPool,
    pub config: Config,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.address, routes::API_ROOT, path)
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }

    /// Makes every insert into `table` fail.
    pub async fn break_inserts(&self, table: &str) {
        sqlx::query(&format!(
            "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table} BEGIN SELECT RAISE(ABORT, 'simulated failure'); END"
        ))
        .execute(&self.pool)
        .await
        .expect("Failed to create trigger");
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        session_token_ttl: 600,
        rust_log: "error".to_string(),
        bind_address: "127.0.0.1:0".parse().unwrap(),
        public_url: "http://localhost:3000".parse().unwrap(),
    }
}

/// In-memory SQLite store. A single connection keeps the database alive for
/// the whole test.
pub async fn memory_pool(migrate: bool) -> AnyPool {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    if migrate {
        store::migrate(&pool, Dialect::Sqlite)
            .await
            .expect("Failed to migrate database");
    }
    pool
}

/// Spawns the app on a random port. Returns the base URL and the store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(true).await
}

pub async fn spawn_app_with(migrate: bool) -> TestApp {
    let pool = memory_pool(migrate).await;
    let config = test_config();

    let state = AppState {
        pool: pool.clone(),
        dialect: Dialect::Sqlite,
        config: config.clone(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        config,
    }
}

pub fn caller(user_id: i64) -> Caller {
    Caller {
        user_id,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    }
}

pub fn token_for(user_id: i64) -> String {
    sign_jwt(&caller(user_id), JWT_SECRET, 600).expect("Failed to sign token")
}

/// A full 35-answer payload produced by actually taking the assessment.
pub fn completed_payload(seed: u64) -> AttemptPayload {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = Session::new(&mut rng);
    let mut n = 0;
    loop {
        session.select(n % 4).unwrap();
        n += 1;
        if session.next().unwrap() == Step::Completed {
            break;
        }
    }
    session.payload(PAYLOAD_VERSION).unwrap()
}
