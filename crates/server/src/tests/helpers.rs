// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use mandodesk_domain::Role;
use mandodesk_persistence::Persistence;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::principal::USER_ID_HEADER;
use crate::{AppState, build_router};

/// A router over a seeded in-memory store.
pub struct TestServer {
    pub app: Router,
    pub customer: i64,
    pub other_customer: i64,
    pub agent: i64,
    pub other_agent: i64,
    pub admin: i64,
}

/// Helper to create a router with one directory user per persona.
pub fn create_test_server() -> TestServer {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let mut add = |name: &str, email: &str, role: Role| {
        persistence.create_user(name, email, role).unwrap()
    };
    let customer = add("Casey Customer", "casey@example.com", Role::Customer);
    let other_customer = add("Olive Other", "olive@example.com", Role::Customer);
    let agent = add("Avery Agent", "avery@example.com", Role::Agent);
    let other_agent = add("Blake Agent", "blake@example.com", Role::Agent);
    let admin = add("Ada Admin", "ada@example.com", Role::Admin);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    TestServer {
        app: build_router(app_state),
        customer,
        other_customer,
        agent,
        other_agent,
        admin,
    }
}

/// Sends one request and returns the status with the JSON body.
///
/// A body that is not JSON comes back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Opens a ticket through the router and returns its ID.
pub async fn open_ticket(server: &TestServer, creator: i64, title: &str) -> i64 {
    let (status, body) = send(
        &server.app,
        "POST",
        "/api/tickets",
        Some(creator),
        Some(json!({
            "title": title,
            "description": "It stopped working this morning.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["ticket_id"].as_i64().unwrap()
}

/// Assigns a ticket through the router as the admin.
pub async fn assign(server: &TestServer, ticket_id: i64, assignee: i64) {
    let (status, _) = send(
        &server.app,
        "PUT",
        &format!("/api/tickets/{ticket_id}"),
        Some(server.admin),
        Some(json!({ "assigned_to": assignee })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// Asserts the body is the standard error envelope.
pub fn assert_error_body(body: &Value) {
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
