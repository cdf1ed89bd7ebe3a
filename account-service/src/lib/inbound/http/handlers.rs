use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::AuthError;

pub mod forgot_password;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod me;
pub mod reset_password;
pub mod sign_up;
pub mod update_password;

/// Successful response envelope: `{ status: "success", token?, message?,
/// data? }`. The token rides in the body in addition to the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                token: None,
                message: None,
                data: Some(data),
            }),
        )
    }

    /// Response carrying a freshly issued session token.
    pub fn with_token(status: StatusCode, token: String, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                token: Some(token),
                message: None,
                data: Some(data),
            }),
        )
    }
}

impl ApiSuccess<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                token: None,
                message: Some(message.into()),
                data: None,
            }),
        )
    }

    pub fn empty(status: StatusCode) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                token: None,
                message: None,
                data: None,
            }),
        )
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// Operational failure with a client-safe message (e.g. the email
    /// channel is down). Responds 500 with the message intact.
    ServiceFailure(String),
    InternalServerError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ApiErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceFailure(msg) => {
                tracing::error!(error = %msg, "Service failure");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::InternalServerError(detail) => {
                // Detail goes to the log only; the client sees a generic body
                tracing::error!(error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        let body = ApiErrorBody {
            status: if status.is_client_error() {
                "fail"
            } else {
                "error"
            },
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidName(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidUserId(_)
            | AuthError::PasswordRule(_)
            | AuthError::MissingCredentials
            | AuthError::InvalidResetToken
            | AuthError::EmailAlreadyExists(_) => ApiError::BadRequest(err.to_string()),

            AuthError::InvalidCredentials
            | AuthError::WrongCurrentPassword
            | AuthError::NotLoggedIn
            | AuthError::InvalidSessionToken
            | AuthError::SubjectGone
            | AuthError::StaleToken => ApiError::Unauthorized(err.to_string()),

            AuthError::Forbidden => ApiError::Forbidden(err.to_string()),

            AuthError::EmailNotFound => ApiError::NotFound(err.to_string()),

            // The client-facing message for a notifier failure is fixed;
            // the transport detail was already logged at the failure site
            AuthError::NotifierFailure(_) => ApiError::ServiceFailure(err.to_string()),

            AuthError::Hashing(_) | AuthError::TokenIssue(_) | AuthError::Database(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Client-facing projection of a user. The password hash has no
/// representation here by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// `data` payload for responses carrying a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub user: UserData,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self { user: user.into() }
    }
}
