use serde::{Deserialize, Serialize};

use crate::board::BoardId;

pub type CardId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: CardId,
    pub board_id: BoardId,
    pub message: String,
    pub likes_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub board_id: BoardId,
    pub message: String,
}
