//! New-book notification side-call
//!
//! Fires a webhook when a book is added with a notification recipient.
//! The call is fire-and-forget: failures are logged, never surfaced to the
//! request that triggered them.

use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::config::NotificationConfig;
use crate::store::Book;

pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            client: Client::new(),
            webhook_url: config.webhook_url.clone(),
        }
    }

    pub fn notify_new_book(&self, recipient: &str, book: &Book) {
        let url = match &self.webhook_url {
            Some(url) => url.clone(),
            None => {
                info!(
                    "No notification webhook configured, skipping notification for '{}'",
                    book.title
                );
                return;
            }
        };

        let payload = json!({
            "to": recipient,
            "subject": format!("New book added: {}", book.title),
            "title": book.title,
            "author": book.author,
            "category": book.category,
        });
        let title = book.title.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Sent new-book notification for '{}'", title);
                }
                Ok(response) => {
                    warn!(
                        "Notification endpoint returned {} for '{}'",
                        response.status(),
                        title
                    );
                }
                Err(e) => {
                    warn!("Failed to send new-book notification for '{}': {}", title, e);
                }
            }
        });
    }
}
