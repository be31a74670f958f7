pub mod auth;
pub mod books;
pub mod config;
pub mod error;
pub mod notify;
pub mod store;

use std::sync::Arc;
use actix_web::HttpResponse;
use tracing::{info, warn};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, AuthenticatedUser, Claims};
pub use store::{AccountStore, BookStore, MemoryAccountStore, MemoryBookStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub accounts: Arc<dyn AccountStore>,
    pub books: Arc<dyn BookStore>,
    pub auth_service: Arc<AuthService>,
    pub notifier: Arc<notify::Notifier>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
        let books: Arc<dyn BookStore> = Arc::new(MemoryBookStore::seeded());
        let auth_service = Arc::new(AuthService::new(accounts.clone(), &config.auth));
        let notifier = Arc::new(notify::Notifier::new(&config.notifications));

        // Seed the default account the demo ships with
        auth_service.register("admin", "admin123").await?;
        info!("Default admin account created: admin/admin123");
        warn!("Change the default admin password outside of demos");

        Ok(Self {
            config: Arc::new(config),
            accounts,
            books,
            auth_service,
            notifier,
        })
    }
}
