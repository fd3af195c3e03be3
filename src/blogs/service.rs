use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::models::{Blog, BlogPatch, Reaction, ReactionState};
use crate::db::store::BlogStore;
use crate::error::AppError;

/// Which reviewer set a count is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Dislikes,
    Comments,
}

pub struct BlogService {
    blogs: Arc<dyn BlogStore>,
}

fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::ValidationError(format!("{} is required", field))),
    }
}

// Supplied patch fields may not be blank; absent ones are left alone.
fn not_blank(field: &str, value: Option<&str>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, Some(v))).transpose()
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogStore>) -> Self {
        Self { blogs }
    }

    pub async fn create(
        &self,
        author: Uuid,
        title: Option<&str>,
        category: Option<&str>,
        description: Option<&str>,
    ) -> Result<Blog, AppError> {
        let blog = Blog::new(
            required("title", title)?,
            required("category", category)?,
            required("description", description)?,
        );
        let blog = self.blogs.insert_blog(&blog).await?;
        info!("User {} created blog {}", author, blog.id);
        Ok(blog)
    }

    pub async fn list(&self) -> Result<Vec<Blog>, AppError> {
        self.blogs.list_blogs().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Blog, AppError> {
        self.blogs.find_blog(id).await?.ok_or_else(AppError::not_found)
    }

    // TODO: restrict edit/delete to the blog's author once blogs record one
    pub async fn edit(&self, editor: Uuid, id: Uuid, patch: &BlogPatch) -> Result<Blog, AppError> {
        let patch = BlogPatch {
            title: not_blank("title", patch.title.as_deref())?,
            category: not_blank("category", patch.category.as_deref())?,
            description: not_blank("description", patch.description.as_deref())?,
        };
        let blog = self
            .blogs
            .update_blog(id, &patch)
            .await?
            .ok_or_else(AppError::not_found)?;
        info!("User {} edited blog {}", editor, id);
        Ok(blog)
    }

    pub async fn delete(&self, editor: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.blogs.delete_blog(id).await? {
            return Err(AppError::not_found());
        }
        info!("User {} deleted blog {}", editor, id);
        Ok(())
    }

    /// Applies a like/dislike toggle and reports where the user ends up.
    pub async fn react(
        &self,
        user_id: Uuid,
        id: Uuid,
        reaction: Reaction,
    ) -> Result<(Blog, ReactionState), AppError> {
        let blog = self
            .blogs
            .toggle_reaction(id, user_id, reaction)
            .await?
            .ok_or_else(AppError::not_found)?;
        let state = blog.reaction_of(&user_id);
        debug!("User {} {:?} on blog {} -> {:?}", user_id, reaction, id, state);
        Ok((blog, state))
    }

    pub async fn count(&self, id: Uuid, counter: Counter) -> Result<usize, AppError> {
        let blog = self.get(id).await?;
        Ok(match counter {
            Counter::Likes => blog.likes.len(),
            Counter::Dislikes => blog.dislikes.len(),
            Counter::Comments => blog.comments.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockBlogStore;
    use crate::error::DatabaseError;

    fn is_not_found(err: &AppError) -> bool {
        matches!(err, AppError::DatabaseError(DatabaseError::NotFound))
    }

    #[tokio::test]
    async fn create_requires_all_fields() {
        let mut store = MockBlogStore::new();
        store.expect_insert_blog().never();
        let svc = BlogService::new(Arc::new(store));

        let err = svc
            .create(Uuid::new_v4(), Some("title"), None, Some("body"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("category")));

        let err = svc
            .create(Uuid::new_v4(), Some("  "), Some("c"), Some("body"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("title")));
    }

    #[tokio::test]
    async fn create_starts_with_empty_sets() {
        let mut store = MockBlogStore::new();
        store.expect_insert_blog().returning(|blog| Ok(blog.clone()));
        let svc = BlogService::new(Arc::new(store));

        let blog = svc
            .create(Uuid::new_v4(), Some("title"), Some("rust"), Some("body"))
            .await
            .unwrap();
        assert!(blog.likes.is_empty());
        assert!(blog.dislikes.is_empty());
        assert!(blog.comments.is_empty());
    }

    #[tokio::test]
    async fn missing_blog_is_not_found_everywhere() {
        let mut store = MockBlogStore::new();
        store.expect_find_blog().returning(|_| Ok(None));
        store.expect_update_blog().returning(|_, _| Ok(None));
        store.expect_delete_blog().returning(|_| Ok(false));
        store.expect_toggle_reaction().returning(|_, _, _| Ok(None));
        let svc = BlogService::new(Arc::new(store));
        let (user, id) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(is_not_found(&svc.get(id).await.unwrap_err()));
        assert!(is_not_found(&svc.edit(user, id, &BlogPatch::default()).await.unwrap_err()));
        assert!(is_not_found(&svc.delete(user, id).await.unwrap_err()));
        assert!(is_not_found(&svc.react(user, id, Reaction::Like).await.unwrap_err()));
        assert!(is_not_found(&svc.count(id, Counter::Likes).await.unwrap_err()));
    }

    #[tokio::test]
    async fn edit_rejects_blank_fields_before_touching_store() {
        let mut store = MockBlogStore::new();
        store.expect_update_blog().never();
        let svc = BlogService::new(Arc::new(store));

        let patch = BlogPatch {
            description: Some(" ".into()),
            ..Default::default()
        };
        let err = svc.edit(Uuid::new_v4(), Uuid::new_v4(), &patch).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn react_reports_resulting_state() {
        let user = Uuid::new_v4();
        let mut store = MockBlogStore::new();
        store.expect_toggle_reaction().returning(|_, user_id, reaction| {
            let mut blog = Blog::new("t".into(), "c".into(), "d".into());
            blog.toggle_reaction(user_id, reaction);
            Ok(Some(blog))
        });
        let svc = BlogService::new(Arc::new(store));

        let (blog, state) = svc.react(user, Uuid::new_v4(), Reaction::Dislike).await.unwrap();
        assert_eq!(state, ReactionState::Disliked);
        assert!(blog.dislikes.contains(&user));
    }

    #[tokio::test]
    async fn counts_read_the_matching_set() {
        let mut blog = Blog::new("t".into(), "c".into(), "d".into());
        blog.toggle_reaction(Uuid::new_v4(), Reaction::Like);
        blog.toggle_reaction(Uuid::new_v4(), Reaction::Like);
        blog.toggle_reaction(Uuid::new_v4(), Reaction::Dislike);
        blog.comments.insert(Uuid::new_v4());
        let id = blog.id;

        let mut store = MockBlogStore::new();
        store.expect_find_blog().returning(move |_| Ok(Some(blog.clone())));
        let svc = BlogService::new(Arc::new(store));

        assert_eq!(svc.count(id, Counter::Likes).await.unwrap(), 2);
        assert_eq!(svc.count(id, Counter::Dislikes).await.unwrap(), 1);
        assert_eq!(svc.count(id, Counter::Comments).await.unwrap(), 1);
    }
}
