#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use osce_server::config::ServerConfig;
use osce_server::state::AppState;

pub const STUDENT: &str = "student-token";
pub const INSTRUCTOR: &str = "instructor-token";

pub fn test_state() -> AppState {
    AppState::new(ServerConfig::default())
}

pub struct Call<'a> {
    pub method: &'a str,
    pub uri: String,
    pub body: Option<Value>,
    pub token: Option<&'a str>,
    pub role: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub fn new(method: &'a str, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body: None,
            token: Some(STUDENT),
            role: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn role(mut self, role: &'a str) -> Self {
        self.role = Some(role);
        self
    }

    pub fn as_instructor(self) -> Self {
        self.token(Some(INSTRUCTOR)).role("instructor")
    }

    pub async fn send(self, app: &Router) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        if let Some(token) = self.token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        if let Some(role) = self.role {
            builder = builder.header("x-user-role", role);
        }
        let body = match self.body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

/// Start a pneumonia session at station-1 and return its id.
pub async fn start(app: &Router, mode: &str) -> String {
    let (status, body) = Call::new("POST", "/session/start")
        .json(json!({ "caseId": "pneumonia", "stationId": "station-1", "mode": mode }))
        .send(app)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["sessionId"].as_str().unwrap().to_string()
}
