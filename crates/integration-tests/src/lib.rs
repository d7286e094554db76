//! Integration tests for the Detach storefront.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`,
//! so no server or network is needed. Submissions go to a [`RecordingSink`]
//! instead of SMTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p detach-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode, header},
};
use detach_core::Catalog;
use detach_storefront::config::StorefrontConfig;
use detach_storefront::content::ContentStore;
use detach_storefront::services::{Notification, NotificationSink, NotifyError};
use detach_storefront::state::AppState;
use tower::ServiceExt;

/// Peer address of every test connection, as recorded by
/// `into_make_service_with_connect_info` in the real server.
pub const PEER_ADDR: ([u8; 4], u16) = ([203, 0, 113, 10], 51_000);

const MAX_BODY: usize = 4 * 1024 * 1024;

/// Notification sink that keeps everything it is given.
#[derive(Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingSink {
    /// A sink whose every delivery fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Notifications delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::InvalidAddress("studio@invalid".to_string()));
        }
        self.delivered.lock().unwrap().push(notification);
        Ok(())
    }
}

/// A response with its body read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront router plus a hand-carried session cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub sink: RecordingSink,
}

impl TestApp {
    /// Storefront with the built-in catalog, bundled content and a recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(RecordingSink::default())
    }

    #[must_use]
    pub fn with_sink(sink: RecordingSink) -> Self {
        let storefront = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront"));
        let mut config = StorefrontConfig::local("http://localhost:3000");
        config.content_dir = storefront.join("content");
        config.static_dir = storefront.join("static");

        let content = ContentStore::load(&config.content_dir).unwrap();
        let state = AppState::new(config, Catalog::detach(), content, Arc::new(sink.clone()));

        Self {
            router: detach_storefront::app(state),
            cookie: None,
            sink,
        }
    }

    /// Send a request from [`PEER_ADDR`] with no proxy headers, attaching
    /// and then updating the session cookie.
    pub async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let mut builder = builder.extension(ConnectInfo(SocketAddr::from(PEER_ADDR)));
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(builder, Body::from(form.to_string())).await
    }

    /// POST a JSON body.
    pub async fn post_json(&mut self, uri: &str, json: &serde_json::Value) -> TestResponse {
        let builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        self.send(builder, Body::from(json.to_string())).await
    }

    /// POST a multipart body built with [`Multipart`].
    pub async fn post_multipart(&mut self, uri: &str, form: Multipart) -> TestResponse {
        let builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", Multipart::BOUNDARY),
        );
        self.send(builder, Body::from(form.finish())).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal multipart/form-data body builder.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub const BOUNDARY: &'static str = "detach-test-boundary";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        self.body
    }
}
