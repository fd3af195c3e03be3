use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Blog, BlogPatch, Reaction, User};
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns None if no user has this email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `DatabaseError::Duplicate` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn insert_blog(&self, blog: &Blog) -> Result<Blog, AppError>;

    /// Most recently updated first.
    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError>;

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, AppError>;

    /// Returns None if the blog does not exist.
    async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> Result<Option<Blog>, AppError>;

    /// Returns false if the blog does not exist.
    async fn delete_blog(&self, id: Uuid) -> Result<bool, AppError>;

    /// Toggles `user_id` in the blog's likes or dislikes as one atomic step,
    /// removing it from the opposite set. Returns None if the blog does not exist.
    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Blog>, AppError>;
}
