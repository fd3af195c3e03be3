//! Authentication module
//!
//! Password hashing, session token issuance/verification, and the request
//! gate that turns a session cookie into an [`AuthenticatedUser`].

pub mod gate;
pub mod handlers;
pub mod password;
mod service;
pub mod token;

pub use gate::{authorize, AuthenticatedUser, SESSION_COOKIE};
pub use password::PasswordHasher;
pub use service::{normalize_email, AuthService};
pub use token::{Claims, TokenService};
