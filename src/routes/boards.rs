use tracing::{debug, info};

use crate::{
    config::AppConfig,
    error::ApiResult,
    repositories::board_repository::BoardRepository,
    response::ApiResponse,
    validation::{resolve_board, validate_create_fields, validate_patch_fields},
};

pub async fn create_board<R: BoardRepository + ?Sized>(
    repo: &R,
    config: &AppConfig,
    body: &str,
) -> ApiResult<ApiResponse> {
    let new_board = validate_create_fields(body, &config.default_theme)?;
    let board = repo.create_board(new_board).await?;
    info!(board_id = board.board_id, title = %board.title, "created board");

    ApiResponse::board(201, &board)
}

pub async fn list_boards<R: BoardRepository + ?Sized>(repo: &R) -> ApiResult<ApiResponse> {
    let boards = repo.list_boards().await?;
    debug!(count = boards.len(), "listed boards");

    ApiResponse::boards(&boards)
}

pub async fn get_board<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_id: &str,
) -> ApiResult<ApiResponse> {
    let board = resolve_board(raw_id, repo).await?;

    ApiResponse::board(200, &board)
}

pub async fn update_board<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_id: &str,
    body: &str,
) -> ApiResult<ApiResponse> {
    let mut board = resolve_board(raw_id, repo).await?;
    let patch = validate_patch_fields(body)?;
    if !patch.is_empty() {
        patch.apply_to(&mut board);
        repo.update_board(&board).await?;
        info!(board_id = board.board_id, "updated board");
    }

    ApiResponse::board(200, &board)
}

pub async fn delete_board<R: BoardRepository + ?Sized>(
    repo: &R,
    raw_id: &str,
) -> ApiResult<ApiResponse> {
    let board = resolve_board(raw_id, repo).await?;
    repo.delete_board(board.board_id).await?;
    info!(
        board_id = board.board_id,
        cards = board.cards.len(),
        "deleted board"
    );

    Ok(ApiResponse::message(
        200,
        format!(
            "Board {} \"{}\" successfully deleted",
            board.board_id, board.title
        ),
    ))
}
