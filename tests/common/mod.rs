#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use chrono_feedback::auth::jwt::{self, Claims};
use chrono_feedback::config::{Config, SmtpConfig};
use chrono_feedback::email::{Mailer, OutgoingMail};
use chrono_feedback::state::SharedState;

pub const OWNER: &str = "owner@chrono.test";
pub const AUTH_SECRET: &str = "test-auth-secret-that-is-long-enough";

/// Mailer that records every message instead of talking to SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failing: AtomicBool,
    failing_for: Mutex<Option<String>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only sends addressed to `recipient`.
    pub fn set_failing_for(&self, recipient: Option<&str>) {
        *self.failing_for.lock().unwrap() = recipient.map(|r| r.to_string());
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Connection refused (os error 111)".to_string());
        }
        if self.failing_for.lock().unwrap().as_deref() == Some(mail.to.as_str()) {
            return Err(format!("550 mailbox unavailable: {}", mail.to));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// A running test server instance with a recording mailer.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub mailer: Arc<RecordingMailer>,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Issue an identity token for `uid`, as the identity provider would.
    pub fn token_for(&self, uid: &str) -> String {
        let claims = Claims::new(uid, chrono::Duration::minutes(15));
        jwt::encode_token(&claims, AUTH_SECRET).unwrap()
    }

    /// Call the direct feedback endpoint, return (body, status).
    pub async fn send_feedback(&self, token: Option<&str>, body: &Value) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url("/v1/feedback")).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("feedback request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Deliver a document-created event, return (body, status).
    pub async fn trigger(&self, document: &str, fields: Value) -> (Value, StatusCode) {
        self.trigger_with_secret(document, fields, None).await
    }

    pub async fn trigger_with_secret(
        &self,
        document: &str,
        fields: Value,
        secret: Option<&str>,
    ) -> (Value, StatusCode) {
        let mut req = self
            .client
            .post(self.url("/v1/triggers/feedback-created"))
            .json(&json!({ "document": document, "fields": fields }));
        if let Some(secret) = secret {
            req = req.header("x-trigger-secret", secret);
        }
        let resp = req.send().await.expect("trigger request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a raw body to `path`, optionally with a bearer token.
    pub async fn post_raw(&self, path: &str, token: Option<&str>, body: Vec<u8>) -> (Value, StatusCode) {
        let mut req = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("raw request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        auth_secret: AUTH_SECRET.to_string(),
        trigger_secret: None,
        owner_email: OWNER.to_string(),
        max_body_size: 65_536,
        dedup_ttl_secs: 86_400,
        log_level: "warn".to_string(),
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            user: OWNER.to_string(),
            pass: "unused".to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    let (app, state) = chrono_feedback::build_app(config, mailer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        mailer,
        state,
    }
}
