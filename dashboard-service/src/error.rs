use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error taxonomy shared by every report endpoint: client input errors map
/// to 400, the cost report's empty aggregate to 404, anything from the query
/// layer to a generic 500 with the cause logged but not leaked.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("startDateTime and endDateTime are required")]
    MissingWindow,
    #[error("zone is required")]
    MissingZone,
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("No consumption data available")]
    NoData,
    #[error("Database query failed")]
    Db(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingWindow | Self::MissingZone | Self::InvalidTimestamp(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NoData => StatusCode::NOT_FOUND,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Db(e) = &self {
            tracing::error!(error = %e, "database query failed");
            metrics::counter!("api_db_errors_total").increment(1);
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
