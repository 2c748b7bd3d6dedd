//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the evaluation use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::ports::{AccountSnapshotPort, AuditRecorderPort, MarketStatsPort};
use crate::application::use_cases::EvaluateOrderUseCase;
use crate::error::{EvaluationError, HttpErrorResponse};

use super::request::EvaluateOrderRequest;
use super::response::{EvaluateOrderResponse, HealthResponse};

/// Application state shared across handlers.
pub struct AppState<S, M, A>
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    /// Use case for evaluating orders.
    pub evaluate_order: Arc<EvaluateOrderUseCase<S, M, A>>,
    /// Application version.
    pub version: String,
}

impl<S, M, A> Clone for AppState<S, M, A>
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    fn clone(&self) -> Self {
        Self {
            evaluate_order: Arc::clone(&self.evaluate_order),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S, M, A>(state: AppState<S, M, A>) -> Router
where
    S: AccountSnapshotPort + 'static,
    M: MarketStatsPort + 'static,
    A: AuditRecorderPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/evaluate", post(evaluate_order))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<S, M, A>(State(state): State<AppState<S, M, A>>) -> impl IntoResponse
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Evaluate order endpoint.
async fn evaluate_order<S, M, A>(
    State(state): State<AppState<S, M, A>>,
    payload: Result<Json<EvaluateOrderRequest>, JsonRejection>,
) -> Response
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = EvaluationError::InvalidOrder {
                field: "body".to_string(),
                message: rejection.body_text(),
            };
            return error_response(&err);
        }
    };

    if let Some(request_id) = &request.request_id {
        tracing::debug!(request_id = %request_id, symbol = %request.order.symbol, "Evaluate request");
    }

    match state.evaluate_order.execute(request.order).await {
        Ok(result) => (StatusCode::OK, Json(EvaluateOrderResponse::from(result))).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &EvaluationError) -> Response {
    let body: HttpErrorResponse = err.to_http_response();
    let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}
