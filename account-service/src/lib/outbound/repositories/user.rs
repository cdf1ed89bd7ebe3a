use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, \
     password_changed_at, password_reset_token_hash, password_reset_expires_at, active";

/// Credential store backed by Postgres.
///
/// Every read filters `active = TRUE`; soft-deleted users are invisible to
/// all lookups including the reset-token path.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    password_changed_at: Option<DateTime<Utc>>,
    password_reset_token_hash: Option<String>,
    password_reset_expires_at: Option<DateTime<Utc>>,
    active: bool,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            name: UserName::new(row.name)
                .map_err(|e| AuthError::Database(format!("corrupt name column: {}", e)))?,
            email: EmailAddress::new(row.email)
                .map_err(|e| AuthError::Database(format!("corrupt email column: {}", e)))?,
            password_hash: row.password_hash,
            role: row
                .role
                .parse()
                .map_err(|e| AuthError::Database(format!("corrupt role column: {}", e)))?,
            password_changed_at: row.password_changed_at,
            password_reset_token_hash: row.password_reset_token_hash,
            password_reset_expires_at: row.password_reset_expires_at,
            active: row.active,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role,
                password_changed_at, password_reset_token_hash,
                password_reset_expires_at, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.password_changed_at)
        .bind(&user.password_reset_token_hash)
        .bind(user.password_reset_expires_at)
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return AuthError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND active = TRUE"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND active = TRUE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE password_reset_token_hash = $1 \
             AND password_reset_expires_at > $2 AND active = TRUE"
        ))
        .bind(digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5,
                password_changed_at = $6, password_reset_token_hash = $7,
                password_reset_expires_at = $8, active = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.password_changed_at)
        .bind(&user.password_reset_token_hash)
        .bind(user.password_reset_expires_at)
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::Database(format!(
                "user {} not found on update",
                user.id
            )));
        }

        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE active = TRUE ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
