use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    serve, Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::markdown::render_html;
use crate::session::{Action, Session, Workflow};

/// Name of the cookie carrying a browser's session id.
pub const SESSION_COOKIE: &str = "swot_session";

type SessionHandle = Arc<Mutex<Session>>;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    // Keyed by session cookie. The map lock is only held for lookups; a
    // session's own lock is held across its provider call.
    // TODO: evict sessions that have been idle for a configurable period.
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
    workflow: Arc<Workflow>,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new(workflow: Workflow, templates_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: Arc::new(create_minijinja_env(templates_dir.into())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            workflow: Arc::new(workflow),
            static_dir: static_dir.into(),
        }
    }

    async fn session(&self, jar: &CookieJar) -> Option<SessionHandle> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let sessions = self.sessions.lock().await;
        sessions.get(cookie.value()).cloned()
    }

    /// The visitor's session, starting a new one (and its cookie) when there is none.
    async fn session_or_create(&self, jar: CookieJar) -> (CookieJar, SessionHandle) {
        let mut sessions = self.sessions.lock().await;
        if let Some(handle) = jar.get(SESSION_COOKIE).and_then(|c| sessions.get(c.value()).cloned()) {
            return (jar, handle);
        }

        let id = Uuid::new_v4().to_string();
        debug!(session = %id, "Starting new session");
        let handle = SessionHandle::default();
        sessions.insert(id.clone(), handle.clone());

        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), handle)
    }
}

// Minijinja Environment setup
fn create_minijinja_env(templates_dir: PathBuf) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

#[derive(Deserialize)]
struct QuestionsForm {
    #[serde(default)]
    domain: String,
}

#[derive(Deserialize)]
struct AnswersForm {
    #[serde(default)]
    answers: String,
}

async fn index_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    // Unknown visitors see a fresh session; it is only stored once they act.
    let handle = state.session(&jar).await.unwrap_or_default();
    let session = handle.lock().await;
    let context = minijinja::context! {
        title => "SWOT Strategy Builder",
        stage => session.stage(),
        domain => &session.domain,
        domain_input => &session.domain_input,
        show_answers => session.accepts_answers(),
        questions_html => session.shifted_questions.as_deref().map(render_html),
        answers => session.answers.as_deref().unwrap_or_default(),
        report_html => session.report.as_deref().map(render_html),
        error => &session.error,
    };

    state
        .templates
        .acquire_env()
        .and_then(|env| env.get_template("index.html").and_then(|tmpl| tmpl.render(context)))
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
        })
}

async fn questions_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<QuestionsForm>,
) -> (CookieJar, Redirect) {
    let (jar, handle) = state.session_or_create(jar).await;
    let mut session = handle.lock().await;
    let action = Action::CreateQuestions { domain: form.domain };
    let redirect = match session.apply(action, &state.workflow).await {
        Ok(_) => Redirect::to("/#questions"),
        Err(_) => Redirect::to("/#error"),
    };
    (jar, redirect)
}

async fn answers_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AnswersForm>,
) -> (CookieJar, Redirect) {
    let (jar, handle) = state.session_or_create(jar).await;
    let mut session = handle.lock().await;
    let action = Action::SubmitAnswers { answers: form.answers };
    let redirect = match session.apply(action, &state.workflow).await {
        Ok(_) => Redirect::to("/#report"),
        Err(_) => Redirect::to("/#error"),
    };
    (jar, redirect)
}

pub fn build_router(state: AppState) -> Router {
    // Serve static files from the configured directory
    let static_files_service = ServeDir::new(&state.static_dir).not_found_service(
        tower::service_fn(|_req: Request| async {
            Ok::<_, Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
        }),
    );

    Router::new()
        .route("/", get(index_handler))
        .route("/questions", post(questions_handler))
        .route("/answers", post(answers_handler))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

pub async fn start_web_server(
    port: u16,
    workflow: Workflow,
    templates_dir: PathBuf,
    static_dir: PathBuf,
) -> Result<()> {
    let state = AppState::new(workflow, templates_dir, static_dir);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
