use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

const UNAUTHORIZED: i32 = 102;
const NOT_FOUND: i32 = 103;

impl Error {
    pub fn invalid_invocation_error() -> Self {
        Self {
            code: 100,
            message: "invalid invocation".into(),
        }
    }

    pub fn invalid_input_error() -> Self {
        Self {
            code: 101,
            message: "invalid input".into(),
        }
    }

    pub fn unauthorized_error() -> Self {
        Self {
            code: UNAUTHORIZED,
            message: "unauthorized".into(),
        }
    }

    pub fn not_found_error() -> Self {
        Self {
            code: NOT_FOUND,
            message: "not found".into(),
        }
    }

    pub fn invalid_rates_error(field: &str) -> Self {
        Self {
            code: 104,
            message: format!("invalid rate table: {}", field),
        }
    }

    pub fn duplicate_account_error() -> Self {
        Self {
            code: 105,
            message: "an account with this email already exists".into(),
        }
    }

    pub fn unexpected_error() -> Self {
        Self {
            code: 1,
            message: "unexpected error".into(),
        }
    }

    pub fn config_error(key: &str) -> Self {
        Self {
            code: 2,
            message: format!("invalid configuration value for {}", key),
        }
    }

    pub fn database_error<T: Debug>(err: T) -> Self {
        tracing::error!(?err, "database error");

        Self {
            code: 3,
            message: "database error".into(),
        }
    }

    pub fn reqwest_error(err: reqwest::Error) -> Self {
        tracing::error!(%err, "reqwest error");

        Self {
            code: 4,
            message: "reqwest error".into(),
        }
    }

    pub fn authorizor_error(err: oso::OsoError) -> Self {
        tracing::error!(%err, "authorizor error");

        Self {
            code: 5,
            message: "authorizor error".into(),
        }
    }

    pub fn upstream_error() -> Self {
        Self {
            code: 6,
            message: "upstream error".into(),
        }
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == NOT_FOUND
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::reqwest_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        Self::authorizor_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            _ if self.is_internal() => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            UNAUTHORIZED => (StatusCode::FORBIDDEN, self.message.as_str()),
            NOT_FOUND => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[test]
fn internal_errors_hide_their_message() {
    let err = Error::config_error("BIND_ADDR");
    assert!(err.is_internal());

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    for err in [Error::unexpected_error(), Error::upstream_error()] {
        assert!(err.is_internal());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[test]
fn client_errors_map_to_status_codes() {
    assert_eq!(
        Error::unauthorized_error().into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        Error::not_found_error().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        Error::invalid_rates_error("vatRate").into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert!(!Error::invalid_input_error().is_internal());
}
