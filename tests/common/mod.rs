#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{json, Value};
use todoforge::config::AuthSettings;
use todoforge::{db, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh in-memory database with the schema applied.
pub async fn test_state() -> AppState {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    db::init_schema(&pool)
        .await
        .expect("Failed to run migrations");
    AppState::new(pool, &AuthSettings::for_testing(TEST_SECRET))
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn signup<S, B>(app: &S, email: &str, username: &str, password: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(json!({
            "email": email,
            "username": username,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Signup failed. Status: {}. Body: {}",
        status,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse signup response")
}

/// Posts the login form and returns the raw response parts.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (actix_web::http::StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn signup_and_login<S, B>(app: &S, email: &str, username: &str, password: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let account = signup(app, email, username, password).await;
    let (status, body) = login(app, email, password).await;
    assert!(status.is_success(), "Login failed: {} {}", status, body);

    TestUser {
        id: account["id"].as_i64().expect("account id"),
        token: body["access_token"]
            .as_str()
            .expect("access_token")
            .to_string(),
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
