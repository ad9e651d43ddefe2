use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure of a dashboard request
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("warehouse query failed: {0}")]
    Warehouse(#[from] sea_orm::DbErr),

    #[error("unknown revenue family: {0}")]
    UnknownFamily(String),

    #[error("configuration is not loaded")]
    NotInitialized,
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Warehouse(_) | DashboardError::NotInitialized => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            DashboardError::UnknownFamily(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Text shown to the caller; warehouse details stay in the log
    pub fn public_message(&self) -> String {
        match self {
            DashboardError::Warehouse(_) | DashboardError::NotInitialized => {
                "data unavailable".to_string()
            }
            DashboardError::UnknownFamily(_) => self.to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_failure_is_reported_as_unavailable() {
        let err = DashboardError::from(sea_orm::DbErr::Custom("connection reset".into()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.public_message(), "data unavailable");
    }

    #[test]
    fn test_unknown_family_is_not_found() {
        let err = DashboardError::UnknownFamily("revenue-x".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.public_message().contains("revenue-x"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
