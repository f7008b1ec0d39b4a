use tracing::{error, warn};
use worker::Method;

use crate::{
    config::AppConfig,
    error::{ApiError, ApiResult},
    repositories::board_repository::BoardRepository,
    response::ApiResponse,
};

pub(crate) mod boards;
pub(crate) mod cards;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Boards,
    Board { board_id: &'a str },
    BoardCards { board_id: &'a str },
    Card { card_id: &'a str },
    CardLike { card_id: &'a str },
    NotFound,
}

pub fn analyze_route(path: &str) -> Route<'_> {
    // /boards, /boards/:board_id, /boards/:board_id/cards, /cards/:card_id, /cards/:card_id/like
    let mut split = path.split('/').collect::<Vec<_>>();
    if split.len() > 1 && split.last() == Some(&"") {
        split.pop();
    }
    match split.as_slice() {
        ["", "boards"] => Route::Boards,
        ["", "boards", board_id] => Route::Board { board_id },
        ["", "boards", board_id, "cards"] => Route::BoardCards { board_id },
        ["", "cards", card_id] => Route::Card { card_id },
        ["", "cards", card_id, "like"] => Route::CardLike { card_id },
        _ => Route::NotFound,
    }
}

fn allowed_methods(route: &Route<'_>) -> &'static [Method] {
    match route {
        Route::Boards => &[Method::Get, Method::Post],
        Route::Board { .. } => &[Method::Get, Method::Patch, Method::Delete],
        Route::BoardCards { .. } => &[Method::Get, Method::Post],
        Route::Card { .. } => &[Method::Get, Method::Delete],
        Route::CardLike { .. } => &[Method::Patch],
        Route::NotFound => &[],
    }
}

/// Comma separated list for the `Access-Control-Allow-Methods` header.
pub fn allow_header(path: &str) -> String {
    allowed_methods(&analyze_route(path))
        .iter()
        .cloned()
        .chain(std::iter::once(Method::Options))
        .map(String::from)
        .collect::<Vec<_>>()
        .join(", ")
}

async fn dispatch<R: BoardRepository + ?Sized>(
    repo: &R,
    config: &AppConfig,
    method: &Method,
    path: &str,
    body: &str,
) -> ApiResult<ApiResponse> {
    let route = analyze_route(path);
    if route == Route::NotFound {
        return Err(ApiError::RouteNotFound {
            path: path.to_owned(),
        });
    }
    if *method == Method::Options {
        return Ok(ApiResponse::empty(204));
    }

    match (route, method) {
        (Route::Boards, Method::Get) => boards::list_boards(repo).await,
        (Route::Boards, Method::Post) => boards::create_board(repo, config, body).await,
        (Route::Board { board_id }, Method::Get) => boards::get_board(repo, board_id).await,
        (Route::Board { board_id }, Method::Patch) => {
            boards::update_board(repo, board_id, body).await
        }
        (Route::Board { board_id }, Method::Delete) => {
            boards::delete_board(repo, board_id).await
        }
        (Route::BoardCards { board_id }, Method::Get) => cards::list_cards(repo, board_id).await,
        (Route::BoardCards { board_id }, Method::Post) => {
            cards::create_card(repo, board_id, body).await
        }
        (Route::Card { card_id }, Method::Get) => cards::get_card(repo, card_id).await,
        (Route::Card { card_id }, Method::Delete) => cards::delete_card(repo, card_id).await,
        (Route::CardLike { card_id }, Method::Patch) => cards::like_card(repo, card_id).await,
        _ => Err(ApiError::MethodNotAllowed {
            method: String::from(method.clone()),
            path: path.to_owned(),
        }),
    }
}

/// Runs one request through routing, validation and storage. Never fails:
/// errors become `{"message": ...}` responses with the matching status.
pub async fn handle_request<R: BoardRepository + ?Sized>(
    repo: &R,
    config: &AppConfig,
    method: &Method,
    path: &str,
    body: &str,
) -> ApiResponse {
    match dispatch(repo, config, method, path, body).await {
        Ok(resp) => resp,
        Err(e) => {
            if let ApiError::Storage(cause) = &e {
                error!(%path, error = ?cause, "storage failure");
            } else {
                warn!(%path, status = e.status_code(), "rejected request: {e}");
            }
            ApiResponse::from(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_paths() {
        let paths = [
            "/boards",
            "/boards/",
            "/boards/1",
            "/boards/one/",
            "/boards/1/cards",
        ];
        let expecteds = [
            Route::Boards,
            Route::Boards,
            Route::Board { board_id: "1" },
            Route::Board { board_id: "one" },
            Route::BoardCards { board_id: "1" },
        ];

        for (path, expected) in paths.iter().zip(expecteds.iter()) {
            assert_eq!(analyze_route(path), *expected);
        }
    }

    #[test]
    fn test_card_paths() {
        let paths = ["/cards/4", "/cards/4/like", "/cards/4/like/"];
        let expecteds = [
            Route::Card { card_id: "4" },
            Route::CardLike { card_id: "4" },
            Route::CardLike { card_id: "4" },
        ];

        for (path, expected) in paths.iter().zip(expecteds.iter()) {
            assert_eq!(analyze_route(path), *expected);
        }
    }

    #[test]
    fn test_not_found_paths() {
        let paths = [
            "/",
            "",
            "/board",
            "/boards/1/2",
            "/cards",
            "/boards/1/cards/2",
            "boards",
        ];
        for path in paths {
            assert_eq!(analyze_route(path), Route::NotFound, "{path}");
        }
    }

    #[test]
    fn test_allow_header() {
        assert_eq!(allow_header("/boards"), "GET, POST, OPTIONS");
        assert_eq!(allow_header("/cards/1/like"), "PATCH, OPTIONS");
    }
}
