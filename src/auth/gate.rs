use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use tracing::{debug, error};
use uuid::Uuid;

use crate::auth::token::TokenService;
use crate::error::{AppError, AuthError};
use crate::AppState;

pub const SESSION_COOKIE: &str = "token";

/// Identity recovered from a valid session cookie.
///
/// Taking this as a handler argument is what makes a route protected: the
/// handler never runs unless the cookie verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Checks a session token read from the cookie jar.
pub fn authorize(token: Option<&str>, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let token = token.ok_or(AuthError::Unauthorized)?;
    let claims = tokens.verify(token).map_err(|e| {
        debug!("Rejected session token: {}", e);
        AuthError::Unauthorized
    })?;

    Ok(AuthenticatedUser { user_id: claims.id })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            error!("AppState missing from app data; rejecting {}", req.path());
            return ready(Err(AppError::InternalError("application state not configured".into())));
        };

        let cookie = req.cookie(SESSION_COOKIE);
        ready(
            authorize(cookie.as_ref().map(|c| c.value()), &state.tokens)
                .map_err(AppError::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::DEFAULT_TOKEN_TTL_HOURS;

    #[test]
    fn missing_cookie_is_unauthorized() {
        let tokens = TokenService::new(Some("s"), DEFAULT_TOKEN_TTL_HOURS);
        assert!(matches!(authorize(None, &tokens), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn bad_token_is_unauthorized() {
        let tokens = TokenService::new(Some("s"), DEFAULT_TOKEN_TTL_HOURS);
        assert!(matches!(authorize(Some("nope"), &tokens), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn valid_token_yields_identity() {
        let tokens = TokenService::new(Some("s"), DEFAULT_TOKEN_TTL_HOURS);
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();
        assert_eq!(
            authorize(Some(&token), &tokens).unwrap(),
            AuthenticatedUser { user_id }
        );
    }
}
