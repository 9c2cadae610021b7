use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use callme_core::AgentPool;
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    agents: Arc<AgentPool>,
    originator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub notifier: HealthCheck,
    pub checked_at: String,
}

impl HealthState {
    pub fn new(agents: Arc<AgentPool>, originator: impl Into<String>) -> Self {
        Self { agents, originator: originator.into() }
    }
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let notifier = notifier_check(&state);
    let ready = notifier.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "callme-server runtime initialized".to_string(),
        },
        notifier,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn notifier_check(state: &HealthState) -> HealthCheck {
    if state.originator.trim().is_empty() {
        return HealthCheck { status: "degraded", detail: "no originator configured".to_string() };
    }

    match state.agents.len() {
        1 => HealthCheck { status: "ready", detail: "1 sales agent configured".to_string() },
        count => HealthCheck { status: "ready", detail: format!("{count} sales agents configured") },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use callme_core::AgentPool;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_with_agents_and_originator() {
        let agents = Arc::new(AgentPool::parse("+1000,+2000").expect("agent pool"));

        let (status, Json(payload)) = health(State(HealthState::new(agents, "Callme"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.notifier.detail, "2 sales agents configured");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_without_originator() {
        let agents = Arc::new(AgentPool::parse("+1000").expect("agent pool"));

        let (status, Json(payload)) = health(State(HealthState::new(agents, " "))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.notifier.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
