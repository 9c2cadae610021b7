//! Landing page and callback request routes.
//!
//! - `GET  /`       — landing page with the callback form
//! - `POST /callme` — validate the lead, text a random sales agent, confirm

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use callme_core::{AgentPool, CallbackError, LeadForm, Notification, Notifier};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::views::{LandingPage, Views};

type PageResult = Result<Html<String>, (StatusCode, Html<String>)>;

#[derive(Clone)]
pub struct CallbackState {
    pub notifier: Arc<dyn Notifier>,
    pub views: Arc<Views>,
    pub agents: Arc<AgentPool>,
    pub originator: String,
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/callme", post(request_callback))
        .with_state(state)
}

pub async fn landing_page(State(state): State<CallbackState>) -> PageResult {
    render(state.views.landing(&LandingPage::default()))
}

// The body is decoded as raw pairs so that a missing content type or a
// repeated field still ends on the landing page instead of a 4xx.
pub async fn request_callback(
    State(state): State<CallbackState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> PageResult {
    let request_id = Uuid::new_v4();
    let form: LeadForm = match form {
        Ok(Form(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            warn!(
                event_name = "callback.request.undecodable",
                request_id = %request_id,
                error = %rejection,
                "callback form could not be decoded, treating fields as empty"
            );
            LeadForm::default()
        }
    };

    handle_lead(&state, form, request_id).await
}

async fn handle_lead(state: &CallbackState, form: LeadForm, request_id: Uuid) -> PageResult {
    match notify_agent(state, &form, request_id).await {
        Ok(()) => render(state.views.sent()),
        Err(callback_error) => {
            warn!(
                event_name = "callback.request.rejected",
                request_id = %request_id,
                error = %callback_error,
                "callback request was not completed"
            );
            render(state.views.landing(&LandingPage {
                error: Some(callback_error.user_message()),
                name: &form.name,
                number: &form.number,
            }))
        }
    }
}

async fn notify_agent(
    state: &CallbackState,
    form: &LeadForm,
    request_id: Uuid,
) -> Result<(), CallbackError> {
    let lead = form.validate()?;
    let recipient = state.agents.pick();

    info!(
        event_name = "callback.request.accepted",
        request_id = %request_id,
        recipient,
        "notifying sales agent about new lead"
    );

    let notification = Notification::for_lead(state.originator.as_str(), recipient, &lead);
    state.notifier.send(&notification).await?;
    Ok(())
}

fn render(page: Result<String, tera::Error>) -> PageResult {
    page.map(Html).map_err(|render_error| {
        error!(
            event_name = "callback.render.failed",
            error = %render_error,
            "failed to render view"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Internal Server Error</h1>".to_string()))
    })
}
