// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller extraction for the server.
//!
//! The upstream identity provider authenticates the caller and forwards
//! the caller's directory ID in the `X-User-Id` header. This module turns
//! that header into a `Principal` by looking the user up in the directory.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use mandodesk_api::{ApiError, resolve_principal};
use mandodesk_domain::Principal;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Header carrying the caller's directory user ID.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor for the calling principal.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     Caller(principal): Caller,
/// ) -> Result<Json<Response>, HttpError> {
///     // principal: Principal
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if:
/// - The `X-User-Id` header is missing
/// - The header is not a decimal integer
/// - No directory user has the ID
pub struct Caller(pub Principal);

impl FromRequestParts<AppState> for Caller {
    type Rejection = CallerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing X-User-Id header");
                CallerError::MissingUserHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid X-User-Id header encoding");
                CallerError::InvalidUserHeader
            })?;

        let user_id: i64 = header.trim().parse().map_err(|_| {
            warn!(header, "X-User-Id header is not a user ID");
            CallerError::InvalidUserHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let principal: Principal =
            resolve_principal(&mut persistence, user_id).map_err(CallerError::Resolution)?;

        debug!(user_id, role = %principal.role, "Caller resolved");
        Ok(Self(principal))
    }
}

/// Caller extraction errors.
#[derive(Debug)]
pub enum CallerError {
    /// The `X-User-Id` header is missing.
    MissingUserHeader,
    /// The `X-User-Id` header is not a user ID.
    InvalidUserHeader,
    /// The directory lookup rejected or failed.
    Resolution(ApiError),
}

impl IntoResponse for CallerError {
    fn into_response(self) -> Response {
        let http_error: HttpError = match self {
            Self::MissingUserHeader => HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: String::from("Missing X-User-Id header"),
            },
            Self::InvalidUserHeader => HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: String::from("Invalid X-User-Id header. Expected a numeric user ID"),
            },
            Self::Resolution(err) => HttpError::from(err),
        };
        http_error.into_response()
    }
}
