use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    board::Board,
    card::Card,
    error::{ApiError, ApiResult},
};

/// Status code plus JSON payload, independent of the HTTP runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    pub fn empty(status: u16) -> ApiResponse {
        ApiResponse {
            status,
            body: Value::Null,
        }
    }

    pub fn message(status: u16, message: impl Into<String>) -> ApiResponse {
        ApiResponse::new(status, json!({ "message": message.into() }))
    }

    pub fn board(status: u16, board: &Board) -> ApiResult<ApiResponse> {
        Ok(ApiResponse::new(status, json!({ "board": to_value(board)? })))
    }

    pub fn boards(boards: &[Board]) -> ApiResult<ApiResponse> {
        Ok(ApiResponse::new(200, json!({ "boards": to_value(boards)? })))
    }

    pub fn card(status: u16, card: &Card) -> ApiResult<ApiResponse> {
        Ok(ApiResponse::new(status, json!({ "card": to_value(card)? })))
    }

    pub fn cards(cards: &[Card]) -> ApiResult<ApiResponse> {
        Ok(ApiResponse::new(200, json!({ "cards": to_value(cards)? })))
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_null()
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        ApiResponse::message(err.status_code(), err.client_message())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Storage(anyhow::anyhow!(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_to_response() {
        let resp = ApiResponse::from(ApiError::InvalidId {
            raw: "one".to_owned(),
        });
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, json!({ "message": "one is not a valid id" }));
    }

    #[test]
    fn test_empty_has_no_body() {
        assert!(!ApiResponse::empty(204).has_body());
        assert!(ApiResponse::message(200, "ok").has_body());
    }
}
