use serde::{Deserialize, Serialize};

use crate::card::Card;

pub type BoardId = i64;

pub const DEFAULT_THEME: &str = "grey";

/// A row of the `boards` table, without its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRow {
    pub board_id: BoardId,
    pub title: String,
    pub owner: String,
    pub theme: String,
}

/// A board as it is returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub board_id: BoardId,
    pub title: String,
    pub owner: String,
    pub theme: String,
    pub cards: Vec<Card>,
}

impl Board {
    pub fn from_row(row: BoardRow, cards: Vec<Card>) -> Board {
        let BoardRow {
            board_id,
            title,
            owner,
            theme,
        } = row;
        Board {
            board_id,
            title,
            owner,
            theme,
            cards,
        }
    }

    pub fn row(&self) -> BoardRow {
        BoardRow {
            board_id: self.board_id,
            title: self.title.clone(),
            owner: self.owner.clone(),
            theme: self.theme.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoard {
    pub title: String,
    pub owner: String,
    pub theme: String,
}

/// Fields of a `PATCH /boards/:id` request. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoardPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl BoardPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.owner.is_none() && self.theme.is_none()
    }

    pub fn apply_to(self, board: &mut Board) {
        if let Some(title) = self.title {
            board.title = title;
        }
        if let Some(owner) = self.owner {
            board.owner = owner;
        }
        if let Some(theme) = self.theme {
            board.theme = theme;
        }
    }
}

/// Groups cards under their boards, keeping the board order and the order of
/// cards within each board.
pub fn assemble_boards(rows: Vec<BoardRow>, cards: Vec<Card>) -> Vec<Board> {
    let mut boards = rows
        .into_iter()
        .map(|row| Board::from_row(row, Vec::new()))
        .collect::<Vec<_>>();
    for card in cards {
        if let Some(board) = boards.iter_mut().find(|b| b.board_id == card.board_id) {
            board.cards.push(card);
        }
    }
    boards
}
