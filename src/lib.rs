pub mod auth;
pub mod blogs;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use std::time::Duration;
use actix_web::{error::InternalError, web, HttpResponse, ResponseError};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::{Settings, StoreBackend};

pub use auth::{AuthService, AuthenticatedUser, PasswordHasher, TokenService};
pub use blogs::BlogService;
pub use db::{BlogStore, DbOperations, MemoryStore, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub blog_service: Arc<BlogService>,
    db: Option<Arc<DbOperations>>,
}

impl AppState {
    /// Connects to the configured store and builds the services.
    pub async fn new(config: Settings) -> Result<Self> {
        match config.database.backend {
            StoreBackend::Postgres => {
                let db = DbOperations::new_with_options(
                    &config.database.url,
                    config.database.max_connections,
                    Duration::from_secs(5),
                )
                .await?;
                db.migrate().await?;
                info!("Connected to Postgres store");

                let db = Arc::new(db);
                let mut state = Self::with_store(config, db.clone(), PasswordHasher::default());
                state.db = Some(db);
                Ok(state)
            }
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on restart");
                Ok(Self::with_store(config, Arc::new(MemoryStore::new()), PasswordHasher::default()))
            }
        }
    }

    /// Builds the state over any store implementing both collections.
    pub fn with_store<S>(config: Settings, store: Arc<S>, hasher: PasswordHasher) -> Self
    where
        S: UserStore + BlogStore + 'static,
    {
        let tokens = Arc::new(TokenService::new(
            config.auth.jwt_secret.as_deref(),
            config.auth.token_expiry_hours,
        ));
        let auth_service = AuthService::new(store.clone(), tokens.clone(), hasher);
        let blog_service = BlogService::new(store);

        Self {
            config: Arc::new(config),
            tokens,
            auth_service: Arc::new(auth_service),
            blog_service: Arc::new(blog_service),
            db: None,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(db) = &self.db {
            db.close().await;
        }
        Ok(())
    }
}

/// Registers every route plus JSON error handling for bad bodies and paths.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    use auth::handlers::{list_users, login, logout, register};
    use blogs::handlers::*;

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::ValidationError(message).error_response()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(err, AppError::not_found().error_response()).into()
    }))
    .route("/health", web::get().to(health_check))
    .route("/register", web::post().to(register))
    .route("/login", web::post().to(login))
    .route("/logout", web::post().to(logout))
    .route("/users", web::get().to(list_users))
    .service(
        web::scope("/blogs")
            .route("", web::get().to(list_blogs))
            .route("", web::post().to(create_blog))
            .route("/{id}", web::get().to(get_blog))
            .route("/{id}", web::put().to(edit_blog))
            .route("/{id}", web::delete().to(delete_blog))
            .route("/{id}/like", web::post().to(like_blog))
            .route("/{id}/dislike", web::post().to(dislike_blog))
            .route("/{id}/countLikes", web::get().to(count_likes))
            .route("/{id}/countDislikes", web::get().to(count_dislikes))
            .route("/{id}/countComments", web::get().to(count_comments)),
    );
}
