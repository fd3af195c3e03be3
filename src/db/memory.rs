use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{Blog, BlogPatch, Reaction, User};
use crate::db::store::{BlogStore, UserStore};
use crate::error::{AppError, DatabaseError};

/// Process-local store. Every mutation happens under a single write lock.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    blogs: RwLock<HashMap<Uuid, Blog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate.into());
        }
        users.insert(user.id, user.clone());
        debug!("Stored user {}", user.id);
        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn insert_blog(&self, blog: &Blog) -> Result<Blog, AppError> {
        let mut blogs = self.blogs.write().await;
        if blogs.contains_key(&blog.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        blogs.insert(blog.id, blog.clone());
        Ok(blog.clone())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        let blogs = self.blogs.read().await;
        let mut all: Vec<Blog> = blogs.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, AppError> {
        Ok(self.blogs.read().await.get(&id).cloned())
    }

    async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> Result<Option<Blog>, AppError> {
        let mut blogs = self.blogs.write().await;
        Ok(blogs.get_mut(&id).map(|blog| {
            blog.apply_patch(patch);
            blog.clone()
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.blogs.write().await.remove(&id).is_some())
    }

    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Blog>, AppError> {
        let mut blogs = self.blogs.write().await;
        Ok(blogs.get_mut(&id).map(|blog| {
            blog.toggle_reaction(user_id, reaction);
            blog.updated_at = Utc::now();
            blog.clone()
        }))
    }
}
