use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{self, Role};
use crate::error::{AppError, Result};
use crate::models::principal::Principal;

pub struct NewPrincipal {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create a principal in the given role collection. Fails with `Conflict`
/// when the username is already taken within that collection; the same
/// username under a different role is fine.
pub async fn create(pool: &SqlitePool, role: Role, new: NewPrincipal) -> Result<Principal> {
    if find_by_username(pool, role, &new.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let principal = Principal {
        id: Uuid::new_v4(),
        role,
        username: new.username,
        password_hash: auth::hash_password(&new.password)?,
        email: new.email,
        first_name: new.first_name,
        last_name: new.last_name,
        created_at: OffsetDateTime::now_utc(),
    };

    // UNIQUE (role, username) backstops the check above; a race surfaces
    // as 409 through the error mapping.
    sqlx::query(
        "INSERT INTO principals (id, role, username, password_hash, email, first_name, last_name, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(principal.id)
    .bind(principal.role)
    .bind(&principal.username)
    .bind(&principal.password_hash)
    .bind(&principal.email)
    .bind(&principal.first_name)
    .bind(&principal.last_name)
    .bind(principal.created_at)
    .execute(pool)
    .await?;

    Ok(principal)
}

/// Case-sensitive exact-match lookup, scoped to one role collection.
pub async fn find_by_username(
    pool: &SqlitePool,
    role: Role,
    username: &str,
) -> Result<Option<Principal>> {
    let row = sqlx::query_as::<_, Principal>(
        "SELECT id, role, username, password_hash, email, first_name, last_name, created_at \
         FROM principals WHERE role = ?1 AND username = ?2",
    )
    .bind(role)
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, role: Role, id: Uuid) -> Result<Option<Principal>> {
    let row = sqlx::query_as::<_, Principal>(
        "SELECT id, role, username, password_hash, email, first_name, last_name, created_at \
         FROM principals WHERE role = ?1 AND id = ?2",
    )
    .bind(role)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_all(pool: &SqlitePool, role: Role) -> Result<Vec<Principal>> {
    let rows = sqlx::query_as::<_, Principal>(
        "SELECT id, role, username, password_hash, email, first_name, last_name, created_at \
         FROM principals WHERE role = ?1",
    )
    .bind(role)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Seed each empty role collection with its well-known default principal.
/// Idempotent: a collection that already has any principal is left alone.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    seed_role(
        pool,
        Role::Admin,
        NewPrincipal {
            username: "csc_admin".into(),
            password: "admin123".into(),
            email: Some("csc@company.com".into()),
            first_name: Some("CSC".into()),
            last_name: Some("Administrator".into()),
        },
    )
    .await?;

    seed_role(
        pool,
        Role::Technician,
        NewPrincipal {
            username: "tech_admin".into(),
            password: "tech123".into(),
            email: Some("tech@company.com".into()),
            first_name: Some("Lab".into()),
            last_name: Some("Technician".into()),
        },
    )
    .await?;

    seed_role(
        pool,
        Role::Requester,
        NewPrincipal {
            username: "testuser".into(),
            password: "test123".into(),
            email: Some("test@example.com".into()),
            first_name: Some("Test".into()),
            last_name: Some("User".into()),
        },
    )
    .await?;

    Ok(())
}

async fn seed_role(pool: &SqlitePool, role: Role, default: NewPrincipal) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM principals WHERE role = ?1")
        .bind(role)
        .fetch_one(pool)
        .await?;

    if count == 0 {
        let username = default.username.clone();
        create(pool, role, default).await?;
        tracing::info!("Seeded default {:?} principal '{}'", role, username);
    }

    Ok(())
}
