#![allow(dead_code)]
use std::net::SocketAddr;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use servicedesk_backend::{api, auth, AppState};

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
const JWT_EXPIRY_HOURS: u64 = 12;

/// Spin up a real Axum server on a random port over a private in-memory
/// SQLite database, returning its address and the pool. Every test gets its
/// own store, so no cross-test cleanup is needed.
pub async fn setup_test_app() -> (SocketAddr, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        // A single connection keeps the in-memory database alive and is all
        // a single-session store needs.
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: JWT_EXPIRY_HOURS,
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, pool)
}

/// Insert a principal directly with an Argon2-hashed password.
/// Returns (principal_id, plaintext_password).
pub async fn create_principal(
    pool: &SqlitePool,
    role: auth::Role,
    username: &str,
) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let password = "testpass123";
    let hash = auth::hash_password(password).expect("Failed to hash password");

    sqlx::query(
        "INSERT INTO principals (id, role, username, password_hash, email, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(role)
    .bind(username)
    .bind(&hash)
    .bind(format!("{}@test.local", username))
    .bind(OffsetDateTime::now_utc())
    .execute(pool)
    .await
    .expect("Failed to create test principal");

    (id, password.to_string())
}

/// Log in via the HTTP API and return the session token.
pub async fn get_auth_token(addr: SocketAddr, username: &str, password: &str, role: &str) -> String {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "username": username,
            "password": password,
            "role": role,
        }))
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(resp.status(), 200, "Login should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("Response should contain token")
        .to_string()
}

/// Register a requester via the HTTP API. Returns (token, principal_id).
pub async fn register_requester(addr: SocketAddr, username: &str) -> (String, Uuid) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/api/auth/register", addr))
        .json(&serde_json::json!({
            "username": username,
            "password": "testpass123",
            "email": format!("{}@test.local", username),
        }))
        .send()
        .await
        .expect("Register request failed");

    assert_eq!(resp.status(), 200, "Registration should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("token").to_string();
    let id = body["principal"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("principal id");

    (token, id)
}

/// A valid simple-request creation payload.
pub fn sample_request_body() -> serde_json::Value {
    serde_json::json!({
        "personalInfo": {
            "fullName": "Jane Requester",
            "email": "jane@example.com",
            "phone": "555-0100",
            "address": "1 Main Street"
        },
        "serviceDetails": {
            "serviceType": "repair",
            "description": "The pressure gauge drifts out of range.",
            "urgency": "medium"
        }
    })
}

/// A valid extended service-request creation payload.
pub fn sample_service_request_body() -> serde_json::Value {
    serde_json::json!({
        "serviceRequestNo": "",
        "organizationName": "Acme Labs",
        "organizationAddress": "1 Industrial Way",
        "contactPerson": "Jane Doe",
        "phoneNo": "555-0100",
        "emailId": "jane@acme.test",
        "calibrationService": "atLaboratory",
        "calibrationRequestDate": "2025-03-02",
        "targetDeliveryDate": "2025-03-10",
        "instrumentCondition": "ok",
        "calibrationMethod": "asPerWorkInstruction"
    })
}

/// Insert a simple request directly with a crafted submission time, for
/// exercising the descending-order listing contract.
pub async fn insert_request_with_time(pool: &SqlitePool, owner: Uuid, time_ns: i64) -> Uuid {
    let id = Uuid::new_v4();
    let ts = OffsetDateTime::from_unix_timestamp_nanos(time_ns as i128)
        .expect("valid timestamp")
        .format(&Rfc3339)
        .expect("formattable timestamp");

    let data = serde_json::json!({
        "id": id,
        "userId": owner,
        "submissionTime": ts,
        "status": "submitted",
        "comments": "",
        "personalInfo": {
            "fullName": "Seeded User",
            "email": "seeded@example.com",
            "phone": "555-0199",
            "address": "9 Backfill Road"
        },
        "serviceDetails": {
            "serviceType": "calibration",
            "description": "seeded record for ordering checks",
            "urgency": "low"
        }
    });

    sqlx::query(
        "INSERT INTO requests (id, owner_id, status, submission_time_ns, data) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(owner)
    .bind("submitted")
    .bind(time_ns)
    .bind(data.to_string())
    .execute(pool)
    .await
    .expect("Failed to insert seeded request");

    id
}

/// Create a token that expired an hour ago, signed with the test secret.
pub fn create_expired_token(principal_id: Uuid) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use servicedesk_backend::auth::{Claims, Role};

    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: principal_id,
        role: Role::Requester,
        exp: (now - time::Duration::hours(1)).unix_timestamp(),
        iat: (now - time::Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

/// Build a reqwest client (reusable across requests in a test).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}
