//! Helpers shared by the integration tests
#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderMap, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use hyper::{Request, StatusCode};
use invoicer_core::app::{InvoicerApp, InvoicerAppBuilder};
use invoicer_core::config::{InvoicerConfig, UserConfig};
use invoicer_core::security::PasswordHasherService;

pub const USER_ID: &str = "410544b2-4001-4271-9855-fec4b6a6442a";
pub const USERNAME: &str = "user@nextmail.com";
pub const PASSWORD: &str = "123456";

/// Low-cost Argon2 parameters so tests stay fast
pub fn cheap_hasher() -> PasswordHasherService {
    PasswordHasherService::with_params(256, 1, 1).unwrap()
}

pub fn seeded_config() -> InvoicerConfig {
    let mut config = InvoicerConfig::default();
    config.users.push(UserConfig {
        id: USER_ID.to_string(),
        username: USERNAME.to_string(),
        password_hash: cheap_hasher().hash_password(PASSWORD).unwrap(),
    });
    config
}

pub fn builder() -> InvoicerAppBuilder {
    InvoicerApp::builder(seeded_config()).with_password_hasher(cheap_hasher())
}

pub fn app() -> InvoicerApp {
    builder().build().unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the `Set-Cookie` header
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie().and_then(|c| c.split(';').next()).map(str::to_string)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(
    app: &InvoicerApp,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    form: Option<&str>,
) -> TestResponse {
    let mut req = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        req = req.header(COOKIE, cookie);
    }
    if form.is_some() {
        req = req.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    let body = Full::new(Bytes::from(form.unwrap_or_default().to_string()));

    let resp = app.handle(req.body(body).unwrap()).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();

    TestResponse { status, headers, body: String::from_utf8(bytes.to_vec()).unwrap() }
}

pub async fn get(app: &InvoicerApp, path: &str, cookie: Option<&str>) -> TestResponse {
    send(app, "GET", path, cookie, None).await
}

pub async fn post(app: &InvoicerApp, path: &str, cookie: Option<&str>, form: &str) -> TestResponse {
    send(app, "POST", path, cookie, Some(form)).await
}

/// Log in with the seeded account and return the session cookie pair
pub async fn login(app: &InvoicerApp) -> String {
    let form = format!("username={}&password={}", urlencode(USERNAME), PASSWORD);
    let resp = post(app, "/login", None, &form).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER, "{}", resp.body);
    resp.cookie_pair().unwrap()
}

pub fn urlencode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
