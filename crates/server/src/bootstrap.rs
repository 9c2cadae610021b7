use std::sync::Arc;

use axum::Router;
use callme_core::config::{AppConfig, ConfigError};
use callme_core::Notifier;
use callme_messagebird::{MessageBirdClient, MessageBirdError};
use thiserror::Error;
use tracing::info;

use crate::callback::{self, CallbackState};
use crate::health::{self, HealthState};
use crate::views::Views;

pub struct Application {
    pub config: AppConfig,
    pub callback: CallbackState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("messagebird client setup failed: {0}")]
    Notifier(#[source] MessageBirdError),
    #[error("view templates failed to load: {0}")]
    Views(#[source] tera::Error),
}

impl Application {
    pub fn router(&self) -> Router {
        let health_state =
            HealthState::new(self.callback.agents.clone(), self.callback.originator.clone());

        callback::router(self.callback.clone()).merge(health::router(health_state))
    }
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let agents = config.agent_pool()?;
    info!(
        event_name = "system.bootstrap.agents_loaded",
        correlation_id = "bootstrap",
        agent_count = agents.len(),
        "sales agent pool loaded"
    );

    let client =
        MessageBirdClient::from_config(&config.messagebird).map_err(BootstrapError::Notifier)?;
    let notifier: Arc<dyn Notifier> = Arc::new(client);

    let views = Views::load(&config.server.templates_dir).map_err(BootstrapError::Views)?;
    info!(
        event_name = "system.bootstrap.views_loaded",
        correlation_id = "bootstrap",
        templates_dir = %config.server.templates_dir.display(),
        "view templates loaded"
    );

    let callback = CallbackState {
        notifier,
        views: Arc::new(views),
        agents: Arc::new(agents),
        originator: config.messagebird.originator.clone(),
    };

    Ok(Application { config, callback })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use callme_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        bootstrap_with_config(AppConfig::load(options)?)
    }

    fn valid_overrides(templates_dir: &std::path::Path) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                messagebird_api_key: Some("test_access_key".to_string()),
                messagebird_originator: Some("Callme".to_string()),
                agent_numbers: Some(vec!["+1000".to_string(), "+2000".to_string()]),
                templates_dir: Some(templates_dir.to_path_buf()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[test]
    fn bootstrap_fails_fast_without_agent_numbers() {
        let dir = TempDir::new().expect("temp dir");
        let mut options = valid_overrides(dir.path());
        options.overrides.agent_numbers = Some(Vec::new());

        let message = bootstrap(options).err().expect("error").to_string();

        assert!(message.contains("sales.agent_numbers"));
    }

    #[tokio::test]
    async fn bootstrapped_router_serves_landing_page_and_health() {
        let dir = TempDir::new().expect("temp dir");
        let app = bootstrap(valid_overrides(dir.path())).expect("bootstrap should succeed");

        assert_eq!(app.callback.agents.len(), 2);
        assert_eq!(app.config.messagebird.originator, "Callme");

        let landing = app
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(landing.status(), StatusCode::OK);
        let bytes = to_bytes(landing.into_body(), usize::MAX).await.expect("body");
        assert!(String::from_utf8_lossy(&bytes).contains("callback-form"));

        let health = app
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(health.status(), StatusCode::OK);
        let bytes = to_bytes(health.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["status"], "ready");
    }
}
