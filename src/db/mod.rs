//! Persistence layer.
//!
//! Services talk to the [`UserStore`] and [`BlogStore`] traits; the server
//! picks Postgres ([`DbOperations`]) or the in-process [`MemoryStore`] at
//! startup.

pub mod memory;
pub mod models;
pub mod operations;
pub mod store;

pub use memory::MemoryStore;
pub use models::{Blog, BlogPatch, Reaction, ReactionState, ReviewerSet, User};
pub use operations::DbOperations;
pub use store::{BlogStore, UserStore};
