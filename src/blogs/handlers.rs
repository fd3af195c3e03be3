use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::blogs::service::Counter;
use crate::db::models::{Blog, BlogPatch, Reaction, ReactionState};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub message: String,
    pub blog: Blog,
}

#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub message: String,
    pub state: ReactionState,
    pub blog: Blog,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub blog_id: Uuid,
    pub count: usize,
}

pub async fn list_blogs(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let blogs = state.blog_service.list().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "blogs": blogs })))
}

pub async fn get_blog(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog = state.blog_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blog))
}

pub async fn create_blog(
    auth: AuthenticatedUser,
    req: web::Json<CreateBlogRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog = state
        .blog_service
        .create(
            auth.user_id,
            req.title.as_deref(),
            req.category.as_deref(),
            req.description.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(BlogResponse {
        message: "Blog created successfully".into(),
        blog,
    }))
}

pub async fn edit_blog(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<BlogPatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog = state
        .blog_service
        .edit(auth.user_id, path.into_inner(), &req)
        .await?;

    Ok(HttpResponse::Ok().json(BlogResponse {
        message: "Blog updated successfully".into(),
        blog,
    }))
}

pub async fn delete_blog(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.blog_service.delete(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Blog deleted successfully"
    })))
}

async fn react(
    auth: AuthenticatedUser,
    id: Uuid,
    reaction: Reaction,
    state: &AppState,
) -> Result<HttpResponse, AppError> {
    let (blog, reaction_state) = state.blog_service.react(auth.user_id, id, reaction).await?;
    info!("User {} reacted to blog {}: {:?}", auth.user_id, id, reaction_state);

    let message = match reaction_state {
        ReactionState::Liked => "Blog liked",
        ReactionState::Disliked => "Blog disliked",
        ReactionState::None => "Reaction removed",
    };
    Ok(HttpResponse::Ok().json(ReactionResponse {
        message: message.into(),
        state: reaction_state,
        blog,
    }))
}

pub async fn like_blog(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    react(auth, path.into_inner(), Reaction::Like, &state).await
}

pub async fn dislike_blog(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    react(auth, path.into_inner(), Reaction::Dislike, &state).await
}

async fn count(
    id: Uuid,
    counter: Counter,
    state: &AppState,
) -> Result<HttpResponse, AppError> {
    let count = state.blog_service.count(id, counter).await?;
    Ok(HttpResponse::Ok().json(CountResponse { blog_id: id, count }))
}

pub async fn count_likes(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    count(path.into_inner(), Counter::Likes, &state).await
}

pub async fn count_dislikes(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    count(path.into_inner(), Counter::Dislikes, &state).await
}

pub async fn count_comments(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    count(path.into_inner(), Counter::Comments, &state).await
}
