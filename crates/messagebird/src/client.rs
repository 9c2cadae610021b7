use std::time::Duration;

use async_trait::async_trait;
use callme_core::config::MessageBirdConfig;
use callme_core::{Notification, NotificationError, Notifier};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum MessageBirdError {
    #[error("could not build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to messagebird failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("messagebird rejected the message with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CreateMessage<'a> {
    pub originator: &'a str,
    pub recipients: Vec<&'a str>,
    pub body: &'a str,
}

impl<'a> From<&'a Notification> for CreateMessage<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            originator: &notification.sender_id,
            recipients: vec![notification.recipient.as_str()],
            body: &notification.body,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    description: Option<String>,
    parameter: Option<String>,
}

impl ErrorPayload {
    fn detail(&self) -> String {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|error| {
                let code = error.code.map(|code| code.to_string()).unwrap_or_else(|| "?".to_string());
                let description = error.description.as_deref().unwrap_or("no description");
                match &error.parameter {
                    Some(parameter) => format!("[{code}] {description} ({parameter})"),
                    None => format!("[{code}] {description}"),
                }
            })
            .collect();

        if parts.is_empty() {
            "no error details returned".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageBirdClient {
    http: Client,
    base_url: String,
    access_key: SecretString,
}

impl MessageBirdClient {
    pub fn new(
        access_key: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MessageBirdError> {
        let http = Client::builder().timeout(timeout).build().map_err(MessageBirdError::Build)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, access_key })
    }

    pub fn from_config(config: &MessageBirdConfig) -> Result<Self, MessageBirdError> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub async fn create_message(
        &self,
        message: &CreateMessage<'_>,
    ) -> Result<MessageResponse, MessageBirdError> {
        let url = format!("{}/messages", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("AccessKey {}", self.access_key.expose_secret()))
            .header("Accept", "application/json")
            .json(message)
            .send()
            .await
            .map_err(MessageBirdError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<ErrorPayload>().await.unwrap_or_default();
            return Err(MessageBirdError::Rejected {
                status: status.as_u16(),
                detail: payload.detail(),
            });
        }

        // The message was accepted; an unreadable body only loses the id.
        Ok(response.json::<MessageResponse>().await.unwrap_or_default())
    }
}

#[async_trait]
impl Notifier for MessageBirdClient {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        match self.create_message(&CreateMessage::from(notification)).await {
            Ok(response) => {
                info!(
                    event_name = "notify.messagebird.sent",
                    message_id = response.id.as_deref().unwrap_or("unknown"),
                    "lead notification accepted by messagebird"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    event_name = "notify.messagebird.failed",
                    error = %error,
                    "lead notification was not delivered"
                );
                Err(NotificationError::new(error.to_string()))
            }
        }
    }
}
