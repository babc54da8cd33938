//! HTTP surface: webhook endpoints wiring resolver, templates, and mail transport.
//!
//! Both webhook endpoints accept a JSON body of unconstrained shape and always
//! answer with a `{success, message}` object. Malformed bodies are a structured
//! failure, never an unhandled fault.

use crate::config::{Config, MailTransportKind};
use crate::mailer::{MailTransport, NoopMailer, SmtpMailer};
use crate::resolver::{self, EndOfCallResolution};
use crate::templates;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn MailTransport>,
}

/// JSON result returned by both webhook endpoints.
#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }

    fn failure(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
        })
    }
}

/// Lenient body parse: any bytes in, `None` (logged) when they are not JSON.
fn parse_body(endpoint: &str, body: &Bytes) -> Option<Value> {
    match serde_json::from_slice(body) {
        Ok(payload) => {
            log::debug!("POST {}: {}", endpoint, payload);
            Some(payload)
        }
        Err(e) => {
            log::warn!("POST {}: invalid JSON body: {}", endpoint, e);
            None
        }
    }
}

async fn deliver(state: &AppState, to: &str, subject: &str, html: &str) -> Json<SendOutcome> {
    match state.mailer.send(to, subject, html).await {
        Ok(()) => SendOutcome::ok(format!("email sent to {}", to)),
        Err(e) => {
            log::warn!("sending email to {} failed: {}", to, e);
            SendOutcome::failure("failed to send email")
        }
    }
}

/// POST /send-specific-email — mid-call tool: send the requested info email.
async fn send_specific_email(State(state): State<AppState>, body: Bytes) -> Json<SendOutcome> {
    let Some(payload) = parse_body("/send-specific-email", &body) else {
        return SendOutcome::failure("invalid JSON body");
    };
    let Some(recipient) = resolver::resolve_mid_call_recipient(&payload) else {
        return SendOutcome::failure("no email provided");
    };
    let (subject, html) = templates::info_email(&recipient, &state.config.branding);
    deliver(&state, &recipient.email, &subject, &html).await
}

/// POST /call-webhook — post-call report: send the follow-up email when the
/// report is relevant and an address can be resolved.
async fn call_webhook(State(state): State<AppState>, body: Bytes) -> Json<SendOutcome> {
    let Some(payload) = parse_body("/call-webhook", &body) else {
        return SendOutcome::failure("invalid JSON body");
    };
    match resolver::resolve_end_of_call_recipient(&payload) {
        EndOfCallResolution::Irrelevant { kind } => {
            let kind = kind.as_deref().unwrap_or("untyped");
            log::debug!("ignoring webhook message kind: {}", kind);
            SendOutcome::ok(format!("ignored: {}", kind))
        }
        EndOfCallResolution::NotFound => {
            log::info!("no email found in end-of-call report");
            SendOutcome::failure("no email found")
        }
        EndOfCallResolution::Found(recipient) => {
            log::info!("resolved end-of-call recipient: {}", recipient.email);
            let (subject, html) = templates::follow_up_email(&state.config.branding);
            deliver(&state, &recipient.email, &subject, &html).await
        }
    }
}

/// GET / returns a simple status JSON (for probes).
async fn root() -> Json<Value> {
    Json(json!({"status": "ok", "service": "callbridge"}))
}

/// GET /health — same contract as /, kept separate for probe configs.
async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Build the router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/send-specific-email", post(send_specific_email))
        .route("/call-webhook", post(call_webhook))
        .with_state(state)
}

/// Construct the configured mail transport and serve until SIGINT/SIGTERM.
pub async fn run_server(config: Config) -> Result<()> {
    let mailer: Arc<dyn MailTransport> = match config.mail.transport {
        MailTransportKind::Smtp => {
            Arc::new(SmtpMailer::from_config(&config).context("building SMTP transport")?)
        }
        MailTransportKind::Noop => Arc::new(NoopMailer),
    };

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let state = AppState {
        config: Arc::new(config),
        mailer,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("callbridge listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    log::info!("server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}
