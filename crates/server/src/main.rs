// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod principal;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use mandodesk_api::{
    AddCommentRequest, ApiError, CreateTicketRequest, ListUsersRequest, StatsSummaryResponse,
    TicketResponse, UpdateTicketRequest, add_comment, create_ticket, get_ticket, list_tickets,
    list_users, seed_demo_users, stats_summary, update_ticket,
};
use mandodesk_domain::UserSummary;
use mandodesk_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::principal::Caller;

/// `MandoDesk` Server - HTTP server for the `MandoDesk` ticket service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 4000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Ensure the demo admin, agent, and customer exist at startup
    #[arg(long)]
    seed_demo_users: bool,
}

/// Application state shared across handlers.
///
/// The store holds a single connection, so it sits behind a mutex.
#[derive(Clone)]
struct AppState {
    /// The ticket store and user directory.
    persistence: Arc<Mutex<Persistence>>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => {
                warn!(error = %err, "Request forbidden");
                Self {
                    status: StatusCode::FORBIDDEN,
                    message: err.to_string(),
                }
            }
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                }
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid ticket id: {}", rejection.body_text()),
        }
    }
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/api/tickets` endpoint.
///
/// Opens a ticket on behalf of the caller.
async fn handle_create_ticket(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TicketResponse>), HttpError> {
    let Json(request) = payload?;
    info!(user_id = principal.id, "Handling create_ticket request");

    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketResponse = create_ticket(&mut persistence, &principal, request)?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Handler for GET `/api/tickets` endpoint.
///
/// Lists the tickets visible to the caller.
async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Vec<TicketResponse>>, HttpError> {
    info!(user_id = principal.id, role = %principal.role, "Handling list_tickets request");

    let mut persistence = app_state.persistence.lock().await;
    let tickets: Vec<TicketResponse> = list_tickets(&mut persistence, &principal)?;

    Ok(Json(tickets))
}

/// Handler for GET `/api/tickets/{ticket_id}` endpoint.
async fn handle_get_ticket(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
    ticket_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TicketResponse>, HttpError> {
    let Path(ticket_id) = ticket_id?;
    info!(user_id = principal.id, ticket_id, "Handling get_ticket request");

    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketResponse = get_ticket(&mut persistence, &principal, ticket_id)?;

    Ok(Json(ticket))
}

/// Handler for PUT `/api/tickets/{ticket_id}` endpoint.
///
/// Changes a ticket's status and/or assignee.
async fn handle_update_ticket(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
    ticket_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTicketRequest>, JsonRejection>,
) -> Result<Json<TicketResponse>, HttpError> {
    let Path(ticket_id) = ticket_id?;
    let Json(request) = payload?;
    info!(
        user_id = principal.id,
        ticket_id,
        status = ?request.status,
        assigned_to = ?request.assigned_to,
        "Handling update_ticket request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketResponse = update_ticket(&mut persistence, &principal, ticket_id, request)?;

    Ok(Json(ticket))
}

/// Handler for POST `/api/tickets/{ticket_id}/comments` endpoint.
async fn handle_add_comment(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
    ticket_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TicketResponse>), HttpError> {
    let Path(ticket_id) = ticket_id?;
    let Json(request) = payload?;
    info!(user_id = principal.id, ticket_id, "Handling add_comment request");

    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketResponse = add_comment(&mut persistence, &principal, ticket_id, request)?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Handler for GET `/api/tickets/__stats/summary` endpoint.
async fn handle_stats_summary(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
) -> Result<Json<StatsSummaryResponse>, HttpError> {
    info!(user_id = principal.id, "Handling stats_summary request");

    let mut persistence = app_state.persistence.lock().await;
    let report: StatsSummaryResponse = stats_summary(&mut persistence, &principal)?;

    Ok(Json(report))
}

/// Handler for GET `/api/users` endpoint.
///
/// Lists directory users, optionally filtered by `?role=`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    Caller(principal): Caller,
    query: Result<Query<ListUsersRequest>, QueryRejection>,
) -> Result<Json<Vec<UserSummary>>, HttpError> {
    let Query(request) = query?;
    info!(user_id = principal.id, role = ?request.role, "Handling list_users request");

    let mut persistence = app_state.persistence.lock().await;
    let users: Vec<UserSummary> = list_users(&mut persistence, &principal, &request)?;

    Ok(Json(users))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/api/tickets",
            get(handle_list_tickets).post(handle_create_ticket),
        )
        .route("/api/tickets/__stats/summary", get(handle_stats_summary))
        .route(
            "/api/tickets/{ticket_id}",
            get(handle_get_ticket).put(handle_update_ticket),
        )
        .route("/api/tickets/{ticket_id}/comments", post(handle_add_comment))
        .route("/api/users", get(handle_list_users))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing MandoDesk Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!(db_path = %db_path, "Using file-based database");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if args.seed_demo_users {
        let seeded: Vec<UserSummary> = seed_demo_users(&mut persistence)?;
        info!(count = seeded.len(), "Demo users ensured");
    }

    let ticket_count: i64 = persistence.count_tickets()?;
    info!(tickets = ticket_count, "Ticket store ready");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
