use std::num::IntErrorKind;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    board::{Board, BoardId, BoardPatch, NewBoard},
    card::{Card, CardId, NewCard},
    error::{ApiError, ApiResult},
    repositories::board_repository::BoardRepository,
};

#[derive(Debug, Default, Deserialize)]
struct CreateBoardBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateCardBody {
    #[serde(default)]
    message: Option<String>,
}

/// Reads a JSON object body. An empty body counts as `{}`.
pub fn parse_body<T: DeserializeOwned + Default>(body: &str) -> ApiResult<T> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    let invalid = |e: serde_json::Error| ApiError::Validation(format!("Invalid request body: {e}"));
    // derived struct deserializers also accept positional arrays
    let value = serde_json::from_str::<Value>(body).map_err(invalid)?;
    if !value.is_object() {
        return Err(ApiError::Validation(
            "Invalid request body: expected a JSON object".to_owned(),
        ));
    }
    serde_json::from_value(value).map_err(invalid)
}

fn required(field: &str, value: Option<String>) -> ApiResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(ApiError::Validation(format!(
            "Invalid request: {field} must not be empty"
        ))),
        None => Err(ApiError::Validation(format!(
            "Invalid request: missing {field}"
        ))),
    }
}

pub fn validate_create_fields(body: &str, default_theme: &str) -> ApiResult<NewBoard> {
    let CreateBoardBody {
        title,
        owner,
        theme,
    } = parse_body(body)?;
    Ok(NewBoard {
        title: required("title", title)?,
        owner: required("owner", owner)?,
        theme: theme.unwrap_or_else(|| default_theme.to_owned()),
    })
}

/// `title` and `owner` may be omitted but never emptied. `theme` is kept verbatim.
pub fn validate_patch_fields(body: &str) -> ApiResult<BoardPatch> {
    let BoardPatch {
        title,
        owner,
        theme,
    } = parse_body(body)?;
    Ok(BoardPatch {
        title: title.map(|t| required("title", Some(t))).transpose()?,
        owner: owner.map(|o| required("owner", Some(o))).transpose()?,
        theme,
    })
}

pub fn validate_card_fields(board_id: BoardId, body: &str) -> ApiResult<NewCard> {
    let CreateCardBody { message } = parse_body(body)?;
    Ok(NewCard {
        board_id,
        message: required("message", message)?,
    })
}

/// An integer too large for `i64` cannot name a stored record, so it is
/// reported as not found rather than malformed.
pub fn parse_id(raw: &str, resource: &'static str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ApiError::NotFound {
            resource,
            id: raw.to_owned(),
        },
        _ => ApiError::InvalidId {
            raw: raw.to_owned(),
        },
    })
}

pub async fn resolve_board<R: BoardRepository + ?Sized>(
    raw_id: &str,
    repo: &R,
) -> ApiResult<Board> {
    let board_id: BoardId = parse_id(raw_id, "Board")?;
    repo.get_board(board_id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Board",
            id: board_id.to_string(),
        })
}

pub async fn resolve_card<R: BoardRepository + ?Sized>(
    raw_id: &str,
    repo: &R,
) -> ApiResult<Card> {
    let card_id: CardId = parse_id(raw_id, "Card")?;
    repo.get_card(card_id).await?.ok_or(ApiError::NotFound {
        resource: "Card",
        id: card_id.to_string(),
    })
}
