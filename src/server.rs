//! JSON-over-HTTP front end for [`Evaluator`].
//!
//! `POST` evaluates `{"expression": "..."}`, `GET` lists the available names,
//! `OPTIONS` answers preflight requests. Every response carries permissive
//! CORS headers.

use crate::engine::Evaluator;
use crate::error::EvalError;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const USAGE: &str =
    "Scientific calculator API. Send POST requests with {\"expression\": \"<expression>\"} to evaluate.";

/// Failure of a request, mapped to a status code and a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("Invalid JSON payload.")]
    InvalidJson,
    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Eval(_) | ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Successful evaluation. Non-finite results serialize as `null`.
#[derive(Serialize)]
struct CalcResponse {
    result: f64,
}

#[derive(Serialize)]
struct Discovery {
    message: &'static str,
    available_functions: Vec<&'static str>,
    available_constants: Vec<&'static str>,
}

/// Build the application router. Served at `/` and `/api/calculate`.
pub fn router(evaluator: Evaluator) -> Router {
    let endpoint = get(describe).post(calculate).options(preflight);
    Router::new()
        .route("/", endpoint.clone())
        .route("/api/calculate", endpoint)
        .with_state(evaluator)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(cors(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .layer(cors(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .layer(TraceLayer::new_for_http())
}

async fn describe(State(evaluator): State<Evaluator>) -> Json<Discovery> {
    let registry = evaluator.registry();
    Json(Discovery {
        message: USAGE,
        available_functions: registry.function_names(),
        available_constants: registry.constant_names(),
    })
}

async fn calculate(
    State(evaluator): State<Evaluator>,
    body: Bytes,
) -> Result<Json<CalcResponse>, ApiError> {
    let expression = expression_from_body(&body)?;
    let result = evaluator.evaluate(&expression).inspect_err(|e| {
        debug!("evaluation of {:?} failed: {}", expression, e);
    })?;
    Ok(Json(CalcResponse { result }))
}

/// Pull `expression` out of the request body. An empty body counts as `{}`;
/// a missing or non-string field counts as the empty expression.
fn expression_from_body(body: &[u8]) -> Result<String, ApiError> {
    let text = if body.is_empty() {
        "{}"
    } else {
        std::str::from_utf8(body).map_err(|_| ApiError::Internal)?
    };
    let payload: serde_json::Value =
        serde_json::from_str(text).map_err(|_| ApiError::InvalidJson)?;
    let fields = payload.as_object().ok_or(ApiError::Internal)?;
    Ok(fields
        .get("expression")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string())
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn cors(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    error!("request handler panicked: {}", detail);
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_extraction() {
        assert_eq!(expression_from_body(b"").unwrap(), "");
        assert_eq!(expression_from_body(br#"{"expression": "1+1"}"#).unwrap(), "1+1");
        assert_eq!(expression_from_body(br#"{"expression": 5}"#).unwrap(), "");
        assert_eq!(expression_from_body(br#"{"other": "x"}"#).unwrap(), "");
        assert!(matches!(expression_from_body(b"{"), Err(ApiError::InvalidJson)));
        assert!(matches!(expression_from_body(b"[1]"), Err(ApiError::Internal)));
        assert!(matches!(expression_from_body(&[0xff, 0xfe]), Err(ApiError::Internal)));
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::from(EvalError::Empty).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::from(EvalError::DivisionByZero).to_string(),
            "Division by zero."
        );
    }
}
