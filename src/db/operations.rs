use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;
use std::time::Duration;
use std::sync::Arc;
use tracing::info;

use crate::db::models::{Blog, BlogPatch, BlogRow, Reaction, User};
use crate::db::store::{BlogStore, UserStore};
use crate::error::AppError;

const BLOG_COLUMNS: &str =
    "id, title, category, description, comments, likes, dislikes, created_at, updated_at";

/// PostgreSQL-backed store.
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Applies the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserStore for DbOperations {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, fullname, email, password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        // The unique index on email turns a racing duplicate into DatabaseError::Duplicate
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, fullname, email, password, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, fullname, email, password, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.fullname)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, fullname, email, password, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl BlogStore for DbOperations {
    async fn insert_blog(&self, blog: &Blog) -> Result<Blog, AppError> {
        let comments: Vec<Uuid> = blog.comments.iter().copied().collect();
        let likes: Vec<Uuid> = blog.likes.iter().copied().collect();
        let dislikes: Vec<Uuid> = blog.dislikes.iter().copied().collect();

        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            INSERT INTO blogs ({BLOG_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.category)
        .bind(&blog.description)
        .bind(comments)
        .bind(likes)
        .bind(dislikes)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        let rows = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY updated_at DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Blog::from).collect())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, AppError> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Blog::from))
    }

    async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> Result<Option<Blog>, AppError> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            UPDATE blogs SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.category.as_deref())
        .bind(patch.description.as_deref())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Blog::from))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Blog>, AppError> {
        let sql = toggle_reaction_sql(reaction);
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Blog::from))
    }
}

/// One UPDATE that removes the user from the opposite column and flips
/// membership in the target column. Every SET expression reads the pre-update
/// row, and the row lock serialises concurrent toggles on the same blog.
fn toggle_reaction_sql(reaction: Reaction) -> String {
    let (target, opposite) = match reaction {
        Reaction::Like => ("likes", "dislikes"),
        Reaction::Dislike => ("dislikes", "likes"),
    };

    format!(
        r#"
        UPDATE blogs SET
            {target} = CASE
                WHEN $2 = ANY({target}) THEN array_remove({target}, $2)
                ELSE array_append({target}, $2)
            END,
            {opposite} = array_remove({opposite}, $2),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {BLOG_COLUMNS}
        "#
    )
}
