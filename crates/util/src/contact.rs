//! Delivery of messages from volunteers to project owners.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("contact request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid contact endpoint '{0}'")]
    InvalidEndpoint(String),
}

#[async_trait::async_trait]
pub trait ContactMessenger: Send + Sync {
    async fn send(&self, project_id: u64, message: &str) -> Result<(), ContactError>;
}

fn ensure_message(message: &str) -> Result<&str, ContactError> {
    let trimmed = message.trim();
    if trimmed.is_empty() { Err(ContactError::EmptyMessage) } else { Ok(trimmed) }
}

/// Posts `{"message": ...}` to `<endpoint>/project/<id>/`.
#[derive(Debug, Clone)]
pub struct HttpContactMessenger {
    endpoint: Url,
    http: Client,
}

impl HttpContactMessenger {
    pub fn new(endpoint: &str) -> Result<Self, ContactError> {
        let mut endpoint = Url::parse(endpoint.trim()).map_err(|_| ContactError::InvalidEndpoint(endpoint.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ContactError::InvalidEndpoint(endpoint.to_string()));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { endpoint, http })
    }

    fn project_url(&self, project_id: u64) -> Result<Url, ContactError> {
        self.endpoint
            .join(&format!("project/{project_id}/"))
            .map_err(|_| ContactError::InvalidEndpoint(self.endpoint.to_string()))
    }
}

#[async_trait::async_trait]
impl ContactMessenger for HttpContactMessenger {
    async fn send(&self, project_id: u64, message: &str) -> Result<(), ContactError> {
        let message = ensure_message(message)?;
        let url = self.project_url(project_id)?;
        debug!(%url, project_id, "sending contact message");
        self.http
            .post(url)
            .json(&json!({ "message": message }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Used when no contact endpoint is configured: the message only reaches the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingContactMessenger;

#[async_trait::async_trait]
impl ContactMessenger for LoggingContactMessenger {
    async fn send(&self, project_id: u64, message: &str) -> Result<(), ContactError> {
        let message = ensure_message(message)?;
        info!(project_id, length = message.len(), "contact message recorded (no endpoint configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_messages_are_rejected() {
        let error = LoggingContactMessenger.send(3, "   \n").await.expect_err("blank message");
        assert!(matches!(error, ContactError::EmptyMessage));
        LoggingContactMessenger.send(3, "Happy to help with the data model").await.expect("delivered");
    }

    #[test]
    fn project_url_nests_under_endpoint() {
        let messenger = HttpContactMessenger::new("https://civic.example.org/api/contact").expect("endpoint");
        let url = messenger.project_url(42).expect("project url");
        assert_eq!(url.as_str(), "https://civic.example.org/api/contact/project/42/");
    }
}
