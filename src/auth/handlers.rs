use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use crate::AppState;
use crate::error::AppError;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", req.username);

    let (token, account) = state.auth_service.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Logged in successfully",
        "token": token,
        "user": {
            "id": account.id,
            "username": account.username,
        },
    })))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for username: {}", req.username);

    state.auth_service.register(&req.username, &req.password).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}
