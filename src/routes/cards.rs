use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    repositories::board_repository::BoardRepository,
    response::ApiResponse,
    validation::{resolve_board, resolve_card, validate_card_fields},
};

pub async fn create_card<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_board_id: &str,
    body: &str,
) -> ApiResult<ApiResponse> {
    let board = resolve_board(raw_board_id, repo).await?;
    let new_card = validate_card_fields(board.board_id, body)?;
    let card = repo.create_card(new_card).await?;
    info!(card_id = card.card_id, board_id = card.board_id, "created card");

    ApiResponse::card(201, &card)
}

pub async fn list_cards<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_board_id: &str,
) -> ApiResult<ApiResponse> {
    let board = resolve_board(raw_board_id, repo).await?;

    ApiResponse::cards(&board.cards)
}

pub async fn get_card<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_card_id: &str,
) -> ApiResult<ApiResponse> {
    let card = resolve_card(raw_card_id, repo).await?;

    ApiResponse::card(200, &card)
}

pub async fn like_card<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_card_id: &str,
) -> ApiResult<ApiResponse> {
    let card = resolve_card(raw_card_id, repo).await?;
    // deleted between resolve and update
    let Some(card) = repo.like_card(card.card_id).await? else {
        return Err(ApiError::NotFound {
            resource: "Card",
            id: card.card_id.to_string(),
        });
    };

    ApiResponse::card(200, &card)
}

pub async fn delete_card<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_card_id: &str,
) -> ApiResult<ApiResponse> {
    let card = resolve_card(raw_card_id, repo).await?;
    repo.delete_card(card.card_id).await?;
    info!(card_id = card.card_id, board_id = card.board_id, "deleted card");

    Ok(ApiResponse::message(
        200,
        format!("Card {} successfully deleted", card.card_id),
    ))
}
