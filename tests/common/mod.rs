#![allow(dead_code)]

use bugvault::{
    app,
    config::{AppConfig, JwtConfig},
    state::AppState,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// An app served on an ephemeral port with fresh in-memory stores,
/// plus a thin JSON client for it.
pub struct TestApp {
    base_url: String,
    http: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    let config = AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        client_origin: "*".into(),
        jwt: JwtConfig {
            secret: "integration-test-secret".into(),
            ttl_hours: 8,
        },
        admin_seed: None,
    };
    let router = app::build_app(AppState::in_memory(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind an ephemeral port");
    let addr = listener.local_addr().expect("listener has no local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("server crashed");
    });

    TestApp {
        base_url: format!("http://{addr}/api/v1"),
        http: reqwest::Client::new(),
    }
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let req = match token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        };
        let res = req.send().await.expect("failed to send a request");
        let status = res.status();
        let text = res.text().await.expect("failed to read the response");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(self.http.get(self.url(path)), token).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        self.send(self.http.post(self.url(path)).json(body), token)
            .await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send(self.http.put(self.url(path)).json(body), token)
            .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(self.http.delete(self.url(path)), token).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut body = json!({ "name": name, "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.post("/auth/register", None, &body).await
    }

    /// Registers and returns the issued token, panicking on failure.
    pub async fn register_ok(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> String {
        let (status, body) = self.register(name, email, password, role).await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body["token"].as_str().expect("no token in response").to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Files a report and returns its id.
    pub async fn report_vulnerability(&self, token: &str, title: &str, severity: &str) -> String {
        let (status, body) = self
            .post(
                "/vulnerabilities",
                Some(token),
                &json!({
                    "title": title,
                    "description": "found during testing",
                    "category": "web",
                    "severity": severity,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "report failed: {body}");
        body["id"].as_str().expect("no id in response").to_string()
    }
}
