//! Shared fixtures for HTTP-level tests.
//!
//! Each test gets a real `AppContext` over its own temporary database with
//! the calendar integration disabled, wrapped by the production router.
//! Requests run through `tower::ServiceExt::oneshot`, so the full
//! middleware chain is exercised.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use callboard_domain::{
    AuthConfig, CalendarConfig, Config, CronConfig, DatabaseConfig, ReservationConfig,
    ServerConfig,
};
use callboard_lib::auth::passwords::hash_password;
use callboard_lib::{build_router, AppContext};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "test-admin";
pub const API_KEY: &str = "crawler-key";
pub const CRON_SECRET: &str = "cron-secret";

pub struct TestApp {
    pub ctx: Arc<AppContext>,
    router: Router,
    _temp_dir: TempDir,
}

pub fn build_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("callboard.db").to_string_lossy().into_owned(),
            pool_size: 2,
        },
        server: ServerConfig::default(),
        auth: AuthConfig { admin_password: ADMIN_PASSWORD.into(), session_ttl_hours: 1 },
        calendar: CalendarConfig {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            male_lead_calendar_id: String::new(),
            female_lead_calendar_id: String::new(),
            all_actors_calendar_id: String::new(),
        },
        reservation: ReservationConfig { api_key: API_KEY.into(), crawler_webhook_url: None },
        cron: CronConfig {
            secret: Some(CRON_SECRET.into()),
            memo_cleanup_cron: "0 0 15 * * *".into(),
            scheduler_enabled: false,
        },
    };

    let ctx = AppContext::new(config).unwrap();
    TestApp { router: build_router(ctx.clone()), ctx, _temp_dir: temp_dir }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Log in with the admin password and return the session token.
    pub async fn admin_token(&self) -> String {
        let response = self.post("/api/login", None, json!({ "password": ADMIN_PASSWORD })).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    /// Insert a user account linked to the given actor and return a session
    /// token for it.
    pub async fn actor_token(&self, actor_id: &str, email: &str, password: &str) -> String {
        let conn = self.ctx.db.get_connection().unwrap();
        conn.execute(
            "INSERT INTO users (id, email, role, actor_id, password_hash, created_at)
             VALUES (?1, ?2, 'ACTOR', ?3, ?4, 0)",
            rusqlite::params![
                uuid::Uuid::now_v7().to_string(),
                email,
                actor_id,
                hash_password(password)
            ],
        )
        .unwrap();

        let response = self
            .post("/api/login", None, json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    /// Create an actor through the API and return its id.
    pub async fn create_actor(&self, admin: &str, name: &str, role_type: &str) -> String {
        let response = self
            .post("/api/actors", Some(admin), json!({ "name": name, "roleType": role_type }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    /// Materialize a month's slots and return them as (id, date, startTime)
    /// triples in date order.
    pub async fn month_slots(
        &self,
        token: &str,
        year: i32,
        month: u32,
    ) -> Vec<(String, String, String)> {
        let response = self
            .get(&format!("/api/schedule?year={year}&month={month}"), Some(token))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        let mut slots = Vec::new();
        for (date, entries) in body["performances"].as_object().unwrap() {
            for slot in entries.as_array().unwrap() {
                slots.push((
                    slot["id"].as_str().unwrap().to_string(),
                    date.clone(),
                    slot["startTime"].as_str().unwrap().to_string(),
                ));
            }
        }
        slots
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
