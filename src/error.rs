use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Everything a request can fail with. Each variant maps to one status code and
/// is reported to the client as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required field, or an unreadable body
    #[error("{0}")]
    Validation(String),

    /// Path id that is not a base-10 integer
    #[error("{raw} is not a valid id")]
    InvalidId { raw: String },

    /// Well-formed id with no record behind it
    #[error("{resource} with id of {id} was not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Not found - {path}")]
    RouteNotFound { path: String },

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId { .. } => 400,
            ApiError::NotFound { .. } | ApiError::RouteNotFound { .. } => 404,
            ApiError::MethodNotAllowed { .. } => 405,
            ApiError::Storage(_) => 500,
        }
    }

    /// Text sent back to the client. Storage details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Storage(_) => "internal server error".to_owned(),
            e => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::InvalidId {
                raw: "one".to_owned()
            }
            .to_string(),
            "one is not a valid id"
        );
        assert_eq!(
            ApiError::NotFound {
                resource: "Board",
                id: "3".to_owned()
            }
            .to_string(),
            "Board with id of 3 was not found"
        );
    }

    #[test]
    fn test_storage_message_is_hidden() {
        let err = ApiError::from(anyhow::anyhow!("failed to bind board_id"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("x".to_owned()).status_code(), 400);
        assert_eq!(
            ApiError::RouteNotFound {
                path: "/nope".to_owned()
            }
            .status_code(),
            404
        );
        assert_eq!(
            ApiError::MethodNotAllowed {
                method: "PUT".to_owned(),
                path: "/boards".to_owned()
            }
            .status_code(),
            405
        );
    }
}
