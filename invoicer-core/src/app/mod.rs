//! The invoicer HTTP application
//!
//! Every request goes through the same pipeline:
//!
//! 1. load the session (cookie, then bearer if enabled)
//! 2. run the route gate unless the path is bypassed
//! 3. dispatch to the public pages or the protected area
//!
//! The app is transport-agnostic: [`InvoicerApp::handle`] takes any
//! `http::Request` whose body implements `hyper::body::Body`, which lets the
//! integration tests drive it without a socket.

mod builder;

pub use builder::InvoicerAppBuilder;

use crate::auth::{CredentialAuthenticator, Credentials, LoginOutcome, LoginState, RouteGate};
use crate::http::error::HttpResult;
use crate::http::request::{parse_form, read_body, segments_under};
use crate::http::response::{self, Resp};
use crate::http::{pages, HttpError};
use crate::invoice::{InvoiceActions, InvoiceError};
use crate::session::{Session, SessionManager, SessionMiddleware, SessionStore};
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

pub struct InvoicerApp {
    gate: RouteGate,
    sessions: Arc<SessionMiddleware>,
    authenticator: CredentialAuthenticator,
    invoices: InvoiceActions,
    min_password_length: usize,
    max_body_size: usize,
    // Held for its cleanup task
    _session_manager: SessionManager<dyn SessionStore>,
}

impl InvoicerApp {
    pub fn builder(config: crate::config::InvoicerConfig) -> InvoicerAppBuilder {
        InvoicerAppBuilder::new(config)
    }

    /// Handle one request; never fails, errors become responses
    pub async fn handle<B>(&self, req: Request<B>) -> Resp
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let resp = match self.dispatch(req).await {
            Ok(resp) => resp,
            Err(e) => e.into_response(&method, &path),
        };

        crate::logging::log_access(&method, &path, resp.status().as_u16(), started);
        resp
    }

    async fn dispatch<B>(&self, req: Request<B>) -> HttpResult<Resp>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let path = req.uri().path().to_string();
        let gated = self.gate.applies_to(&path);
        let protected = segments_under(&path, self.gate.protected_prefix());

        let session = if gated || protected.is_some() {
            self.sessions.extract_session(&req).await?
        } else {
            None
        };

        if gated {
            let decision = self.gate.evaluate(session.is_some(), &path);
            if let Some(target) = self.gate.redirect_target(decision) {
                log::debug!("{:?} for {}, redirecting to {}", decision, path, target);
                return Ok(response::redirect(StatusCode::FOUND, target));
            }
        }

        let (parts, body) = req.into_parts();

        if let Some(segments) = protected {
            return self.protected(&parts.method, &segments, session, body).await;
        }

        if path == self.gate.login_path() {
            return match parts.method {
                Method::GET => Ok(self.login_form(StatusCode::OK, &LoginState::Idle, "")),
                Method::POST => self.login(body).await,
                _ => Ok(response::method_not_allowed_response("GET, POST")),
            };
        }

        match (&parts.method, path.as_str()) {
            (&Method::GET, "/") => {
                Ok(response::html_response(StatusCode::OK, pages::home_page(self.gate.login_path())))
            }
            _ => Ok(response::not_found_response()),
        }
    }

    async fn protected<B>(
        &self,
        method: &Method,
        segments: &[&str],
        session: Option<Session>,
        body: B,
    ) -> HttpResult<Resp>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        // Only a bypassed path gets here without a session.
        let Some(session) = session else {
            return Ok(response::redirect(StatusCode::FOUND, self.gate.login_path()));
        };

        match (method, segments) {
            (&Method::GET, []) => self.dashboard(&session).await,
            (_, []) => Ok(response::method_not_allowed_response("GET")),

            (&Method::POST, ["logout"]) => self.logout(&session).await,
            (_, ["logout"]) => Ok(response::method_not_allowed_response("POST")),

            (&Method::GET, ["invoices"]) => self.list_invoices().await,
            (&Method::POST, ["invoices"]) => {
                let fields = parse_form(&read_body(body, self.max_body_size).await?);
                self.invoice_action(self.invoices.create_invoice(&fields).await)
            }
            (_, ["invoices"]) => Ok(response::method_not_allowed_response("GET, POST")),

            (&Method::POST | &Method::PUT, ["invoices", id]) => {
                let fields = parse_form(&read_body(body, self.max_body_size).await?);
                self.invoice_action(self.invoices.update_invoice(id, &fields).await)
            }
            (&Method::DELETE, ["invoices", id]) | (&Method::POST, ["invoices", id, "delete"]) => {
                self.invoice_action(self.invoices.delete_invoice(id).await)
            }
            (_, ["invoices", _]) => Ok(response::method_not_allowed_response("POST, PUT, DELETE")),
            (_, ["invoices", _, "delete"]) => Ok(response::method_not_allowed_response("POST")),

            _ => Ok(response::not_found_response()),
        }
    }

    async fn login<B>(&self, body: B) -> HttpResult<Resp>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let fields = parse_form(&read_body(body, self.max_body_size).await?);
        let username = fields.get("username").map(|s| s.trim()).unwrap_or_default().to_string();

        let credentials = match Credentials::from_form(&fields, self.min_password_length) {
            Ok(credentials) => credentials,
            Err(e) => {
                log::debug!("Login form rejected: {}", e);
                let state = LoginState::Invalid(e);
                return Ok(self.login_form(StatusCode::BAD_REQUEST, &state, &username));
            }
        };

        match self.authenticator.authenticate(&credentials).await? {
            LoginOutcome::Authenticated(session) => {
                let resp = response::see_other(self.gate.landing_route());
                Ok(response::with_cookie(resp, &self.sessions.set_cookie_header(&session)))
            }
            LoginOutcome::Rejected(reason) => {
                let state = LoginState::Rejected(reason);
                Ok(self.login_form(StatusCode::OK, &state, &username))
            }
        }
    }

    async fn logout(&self, session: &Session) -> HttpResult<Resp> {
        self.sessions.destroy(&session.id).await?;

        if let Some(identity) = session.identity() {
            log::info!("User logged out: {} ({})", identity.username, identity.user_id);
        }

        let resp = response::see_other(self.gate.login_path());
        Ok(response::with_cookie(resp, &self.sessions.clear_cookie_header()))
    }

    async fn dashboard(&self, session: &Session) -> HttpResult<Resp> {
        let summary = match self.invoices.summary().await {
            Ok(summary) => summary,
            Err(e) => return self.invoice_error(e),
        };

        Ok(response::json_response(
            StatusCode::OK,
            &json!({ "user": session.identity(), "summary": summary }),
        ))
    }

    async fn list_invoices(&self) -> HttpResult<Resp> {
        match self.invoices.list().await {
            Ok(invoices) => {
                Ok(response::json_response(StatusCode::OK, &json!({ "invoices": invoices })))
            }
            Err(e) => self.invoice_error(e),
        }
    }

    fn invoice_action(&self, result: Result<String, InvoiceError>) -> HttpResult<Resp> {
        match result {
            Ok(target) => Ok(response::see_other(&target)),
            Err(e) => self.invoice_error(e),
        }
    }

    fn invoice_error(&self, err: InvoiceError) -> HttpResult<Resp> {
        match err {
            InvoiceError::Form(e) => {
                log::debug!("{}", e);
                Ok(response::json_response(
                    StatusCode::BAD_REQUEST,
                    &json!({
                        "error": "validation_error",
                        "message": "Missing or invalid fields.",
                        "fields": e.fields,
                    }),
                ))
            }
            InvoiceError::NotFound(id) => Ok(response::json_error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                &format!("Invoice {} not found", id),
            )),
            InvoiceError::Store(e) => Err(HttpError::Store(e)),
        }
    }

    fn login_form(&self, status: StatusCode, state: &LoginState, username: &str) -> Resp {
        response::html_response(status, pages::login_page(self.gate.login_path(), state, username))
    }
}
