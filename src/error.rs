use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use foodgram_shared::Error;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

/// Domain error on its way to the client.
#[derive(Debug)]
pub struct AppError(pub Error);

pub type AppResult<T> = Result<T, AppError>;

/// `axum::Json` whose rejection renders like any other validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path`, a segment that fails to parse is a JSON 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor accepting repeated keys such as `tags=a&tags=b`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

impl From<Error> for AppError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self(Error::Unknown(value))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self(value.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self(Error::field("non_field_errors", value.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        Self(Error::NotFound(value.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self(Error::field("non_field_errors", value.body_text()))
    }
}

/// `{field: [message, ...]}` as returned for every validation failure.
pub fn validation_body(errors: &ValidationErrors) -> Value {
    let mut body = Map::new();

    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|err| match &err.message {
                Some(message) => Value::String(message.to_string()),
                None => Value::String(format!("Invalid value ({}).", err.code)),
            })
            .collect();

        body.insert(field.to_string(), Value::Array(messages));
    }

    Value::Object(body)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            Error::Validate(errors) => (StatusCode::BAD_REQUEST, validation_body(&errors)),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "detail": message })),
            Error::NotInCollection(message) | Error::Duplicate(message) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": message }))
            }
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "detail": "You do not have permission to perform this action." }),
            ),
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "Authentication credentials were not provided." }),
            ),
            Error::Server(message) => {
                tracing::error!(error = %message, "server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }
            Error::Unknown(err) => {
                tracing::error!(error = ?err, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
