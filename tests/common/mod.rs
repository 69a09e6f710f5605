//! Cookie-carrying client over the full router, backed by the in-memory store.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use bookings::api::AppState;
use bookings::config::{Config, SecurityConfig};
use bookings::constants::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use bookings::db::InMemoryStore;
use bookings::services::{MailData, Mailer};
use http_body_util::BodyExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<InMemoryStore>,
    pub mail: mpsc::Receiver<MailData>,
    cookie: Option<String>,
}

pub fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
        auto_migrate_password_hashes: false,
    }
}

pub async fn spawn_app() -> TestApp {
    let mut config = Config::default();
    config.general.database_path = "memory".to_string();
    config.observability.metrics_enabled = false;
    config.security = fast_security();

    let store = Arc::new(
        InMemoryStore::new()
            .with_user(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, &config.security)
            .expect("failed to seed admin"),
    );
    let (mailer, mail) = Mailer::channel(&config.mail);

    let state = AppState::new(config, store.clone(), None, mailer, None);
    let router = bookings::api::router(state.clone())
        .await
        .expect("failed to build router");

    TestApp {
        router,
        state,
        store,
        mail,
        cookie: None,
    }
}

impl TestApp {
    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response<Body> {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&mut self) {
        let body = format!("email={DEFAULT_ADMIN_EMAIL}&password={DEFAULT_ADMIN_PASSWORD}");
        let response = self.post_form("/user/login", &body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/dashboard");
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self.router.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default().to_string();
            self.cookie = Some(pair);
        }
        response
    }
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap())
        .unwrap_or_default()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
