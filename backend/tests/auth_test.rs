mod common;

use servicedesk_backend::auth::Role;
use servicedesk_backend::store::principals;

#[tokio::test]
async fn register_returns_token_and_profile_without_credentials() {
    let (addr, _pool) = common::setup_test_app().await;

    let client = common::http_client();
    let resp = client
        .post(format!("http://{}/api/auth/register", addr))
        .json(&serde_json::json!({
            "username": "fresh_requester",
            "password": "testpass123",
            "email": "fresh@test.local",
            "firstName": "Fresh",
            "lastName": "Requester",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["token"].is_string(), "Response should contain a token");
    assert_eq!(body["principal"]["username"].as_str().unwrap(), "fresh_requester");
    assert_eq!(body["principal"]["role"].as_str().unwrap(), "requester");
    assert!(
        body["principal"].get("password").is_none()
            && body["principal"].get("passwordHash").is_none(),
        "Credential material must never be serialized"
    );

    // The new requester is authenticated immediately.
    let token = body["token"].as_str().unwrap();
    let me = client
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), 200);
    let me: serde_json::Value = me.json().await.unwrap();
    assert_eq!(me["username"].as_str().unwrap(), "fresh_requester");
}

#[tokio::test]
async fn seeded_default_admin_can_log_in() {
    let (addr, pool) = common::setup_test_app().await;
    principals::seed_defaults(&pool).await.unwrap();

    let token = common::get_auth_token(addr, "csc_admin", "admin123", "admin").await;

    let client = common::http_client();
    let resp = client
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["role"].as_str().unwrap(), "admin");
    assert_eq!(body["email"].as_str().unwrap(), "csc@company.com");
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let (_addr, pool) = common::setup_test_app().await;
    principals::seed_defaults(&pool).await.unwrap();
    principals::seed_defaults(&pool).await.unwrap();

    let admins = principals::list_all(&pool, Role::Admin).await.unwrap();
    assert_eq!(admins.len(), 1, "Seeding twice must not duplicate defaults");

    // A collection that already has a principal is never reseeded.
    let (_id, _pw) = common::create_principal(&pool, Role::Requester, "existing_user").await;
    principals::seed_defaults(&pool).await.unwrap();
    let requesters = principals::list_all(&pool, Role::Requester).await.unwrap();
    assert!(requesters.iter().all(|p| p.username != "testuser"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (addr, pool) = common::setup_test_app().await;
    let (_id, _password) = common::create_principal(&pool, Role::Requester, "known_user").await;

    let client = common::http_client();

    let wrong_password = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "username": "known_user",
            "password": "not-the-password",
            "role": "requester",
        }))
        .send()
        .await
        .unwrap();
    let unknown_user = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "username": "never_registered",
            "password": "whatever",
            "role": "requester",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    // Identical bodies: the response must not reveal which factor failed.
    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn login_is_scoped_by_role() {
    let (addr, pool) = common::setup_test_app().await;
    let (_id, password) = common::create_principal(&pool, Role::Technician, "scoped_user").await;

    // Correct credentials under the wrong role collection fail.
    let client = common::http_client();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "username": "scoped_user",
            "password": password,
            "role": "requester",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let token = common::get_auth_token(addr, "scoped_user", &password, "technician").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn duplicate_username_within_role_conflicts_but_cross_role_succeeds() {
    let (addr, pool) = common::setup_test_app().await;
    // The username already exists in the admin collection.
    let (_id, _pw) = common::create_principal(&pool, Role::Admin, "shared_name").await;

    let client = common::http_client();

    // Same username in a different role collection is fine.
    let cross_role = client
        .post(format!("http://{}/api/auth/register", addr))
        .json(&serde_json::json!({
            "username": "shared_name",
            "password": "testpass123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(cross_role.status(), 200);

    // Registering it again within the requester collection collides.
    let duplicate = client
        .post(format!("http://{}/api/auth/register", addr))
        .json(&serde_json::json!({
            "username": "shared_name",
            "password": "testpass123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), 409);
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let (addr, pool) = common::setup_test_app().await;
    let (id, _pw) = common::create_principal(&pool, Role::Requester, "token_user").await;

    let client = common::http_client();

    let no_token = client
        .get(format!("http://{}/api/requests", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), 401);

    let garbage = client
        .get(format!("http://{}/api/requests", addr))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), 401);

    let expired = client
        .get(format!("http://{}/api/requests", addr))
        .header(
            "Authorization",
            format!("Bearer {}", common::create_expired_token(id)),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(expired.status(), 401);
}

#[tokio::test]
async fn token_for_deleted_principal_is_rejected() {
    let (addr, pool) = common::setup_test_app().await;
    let (id, password) = common::create_principal(&pool, Role::Requester, "ghost_user").await;
    let token = common::get_auth_token(addr, "ghost_user", &password, "requester").await;

    sqlx::query("DELETE FROM principals WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let client = common::http_client();
    let resp = client
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}
