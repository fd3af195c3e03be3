//! Blog CRUD, like/dislike reactions and counters.

pub mod handlers;
mod service;

pub use service::{BlogService, Counter};
