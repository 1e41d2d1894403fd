use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("{date} is already recorded; amend it instead")]
    AlreadyRecorded { date: String },
    #[error("invalid amendment: {0}")]
    InvalidAmendment(String),
    #[error("malformed record for {date}: {reason}")]
    MalformedRecord { date: String, reason: String },
}

impl TrackerError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
    #[error("{name} is not a valid date (expected YYYY-MM-DD): {value}")]
    InvalidDate { name: &'static str, value: String },
    #[error("{name} must be a positive number, got {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("layout leaves no room for a single column")]
    NoColumns,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let status = match &err {
            TrackerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TrackerError::AlreadyRecorded { .. } => StatusCode::CONFLICT,
            TrackerError::InvalidAmendment(_) => StatusCode::BAD_REQUEST,
            TrackerError::MalformedRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_errors_map_to_http_statuses() {
        let conflict = AppError::from(TrackerError::AlreadyRecorded {
            date: "2025-04-10".into(),
        });
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert!(conflict.message.contains("2025-04-10"));

        let unavailable = AppError::from(TrackerError::storage("disk gone"));
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);

        let invalid = AppError::from(TrackerError::InvalidAmendment("negative".into()));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
