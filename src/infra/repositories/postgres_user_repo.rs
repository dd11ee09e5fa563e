use crate::domain::{models::user::{Role, User, UserStatus}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(row: &PgRow) -> Result<User, AppError> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: Role::parse(&role)?,
        status: UserStatus::parse(&status)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
            .bind(&user.id).bind(&user.name).bind(&user.email).bind(&user.password_hash)
            .bind(user.role.as_str()).bind(user.status.as_str()).bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;
        map_user(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT * FROM users WHERE role = 'user' ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_user).collect()
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query(
            "UPDATE users SET name = $1, email = $2, password_hash = $3, role = $4, status = $5
             WHERE id = $6
             RETURNING *",
        )
            .bind(&user.name).bind(&user.email).bind(&user.password_hash)
            .bind(user.role.as_str()).bind(user.status.as_str()).bind(&user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        map_user(&row)
    }

    async fn count_customers(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'user'")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
