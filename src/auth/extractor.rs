use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::{AppError, AuthError};
use crate::AppState;

/// Identity attached to a request once its bearer token checks out.
///
/// Protected routes take this as a handler argument; extraction runs before
/// the handler body, so a rejected request never reaches it and no partial
/// mutation can occur.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: i64,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("application state not configured".into()))?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or(AuthError::NoToken)?;

    // Expected form: `Bearer <token>`
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)?;

    let claims = state.auth_service.decode_token(token)?;
    let account_id = claims
        .sub
        .parse()
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthenticatedUser {
        account_id,
        username: claims.username,
    })
}
