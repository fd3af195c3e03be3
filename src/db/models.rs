use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `password` must already be hashed.
    pub fn new(fullname: String, email: String, password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            fullname,
            email,
            password,
            created_at: Utc::now(),
        }
    }
}

/// A set of user (or comment) ids attached to a blog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerSet(BTreeSet<Uuid>);

impl ReviewerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: Uuid) -> bool {
        self.0.insert(id)
    }

    /// Returns false if the id was not present.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.0.remove(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.0.iter()
    }
}

impl FromIterator<Uuid> for ReviewerSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Uuid>> for ReviewerSet {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// Where a single user stands on a single blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
    None,
    Liked,
    Disliked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: String,
    pub comments: ReviewerSet,
    pub likes: ReviewerSet,
    pub dislikes: ReviewerSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn new(title: String, category: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            category,
            description,
            comments: ReviewerSet::new(),
            likes: ReviewerSet::new(),
            dislikes: ReviewerSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reaction_of(&self, user_id: &Uuid) -> ReactionState {
        if self.likes.contains(user_id) {
            ReactionState::Liked
        } else if self.dislikes.contains(user_id) {
            ReactionState::Disliked
        } else {
            ReactionState::None
        }
    }

    /// Applies a like or dislike from `user_id` and returns the resulting state.
    ///
    /// The opposite set is cleared first, then the target set is toggled:
    /// reacting the same way twice withdraws the reaction.
    pub fn toggle_reaction(&mut self, user_id: Uuid, reaction: Reaction) -> ReactionState {
        let (target, opposite) = match reaction {
            Reaction::Like => (&mut self.likes, &mut self.dislikes),
            Reaction::Dislike => (&mut self.dislikes, &mut self.likes),
        };

        opposite.remove(&user_id);
        if !target.remove(&user_id) {
            target.insert(user_id);
        }

        self.reaction_of(&user_id)
    }

    pub fn apply_patch(&mut self, patch: &BlogPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Row shape of the `blogs` table; the id arrays become [`ReviewerSet`]s.
#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: String,
    pub comments: Vec<Uuid>,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            description: row.description,
            comments: row.comments.into(),
            likes: row.likes.into(),
            dislikes: row.dislikes.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial edit of a blog. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}
