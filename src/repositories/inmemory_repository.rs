use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    board::{assemble_boards, Board, BoardId, BoardRow, NewBoard},
    card::{Card, CardId, NewCard},
    repositories::board_repository::BoardRepository,
};

#[derive(Debug, Default)]
struct Tables {
    last_board_id: BoardId,
    last_card_id: CardId,
    boards: BTreeMap<BoardId, BoardRow>,
    cards: BTreeMap<CardId, Card>,
}

impl Tables {
    fn cards_of(&self, board_id: BoardId) -> Vec<Card> {
        self.cards
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect()
    }
}

/// Process-local store. Every call takes the lock once and releases it before
/// returning, so id assignment and cascading deletes are never interleaved.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> InMemoryRepository {
        InMemoryRepository::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow::anyhow!("Mutex is Poisoned"))
    }
}

#[async_trait(?Send)]
impl BoardRepository for InMemoryRepository {
    async fn create_board(&self, board: NewBoard) -> anyhow::Result<Board> {
        let mut tables = self.lock()?;
        tables.last_board_id += 1;
        let row = BoardRow {
            board_id: tables.last_board_id,
            title: board.title,
            owner: board.owner,
            theme: board.theme,
        };
        tables.boards.insert(row.board_id, row.clone());
        Ok(Board::from_row(row, Vec::new()))
    }

    async fn list_boards(&self) -> anyhow::Result<Vec<Board>> {
        let tables = self.lock()?;
        Ok(assemble_boards(
            tables.boards.values().cloned().collect(),
            tables.cards.values().cloned().collect(),
        ))
    }

    async fn get_board(&self, board_id: BoardId) -> anyhow::Result<Option<Board>> {
        let tables = self.lock()?;
        Ok(tables
            .boards
            .get(&board_id)
            .cloned()
            .map(|row| Board::from_row(row, tables.cards_of(board_id))))
    }

    async fn update_board(&self, board: &Board) -> anyhow::Result<()> {
        let mut tables = self.lock()?;
        let Some(row) = tables.boards.get_mut(&board.board_id) else {
            return Err(anyhow::anyhow!("board {} vanished before update", board.board_id));
        };
        *row = board.row();
        Ok(())
    }

    async fn delete_board(&self, board_id: BoardId) -> anyhow::Result<()> {
        let mut tables = self.lock()?;
        tables.cards.retain(|_, c| c.board_id != board_id);
        tables.boards.remove(&board_id);
        Ok(())
    }

    async fn create_card(&self, card: NewCard) -> anyhow::Result<Card> {
        let mut tables = self.lock()?;
        if !tables.boards.contains_key(&card.board_id) {
            return Err(anyhow::anyhow!("board {} does not exist", card.board_id));
        }
        tables.last_card_id += 1;
        let card = Card {
            card_id: tables.last_card_id,
            board_id: card.board_id,
            message: card.message,
            likes_count: 0,
        };
        tables.cards.insert(card.card_id, card.clone());
        Ok(card)
    }

    async fn list_cards(&self, board_id: BoardId) -> anyhow::Result<Vec<Card>> {
        Ok(self.lock()?.cards_of(board_id))
    }

    async fn get_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>> {
        Ok(self.lock()?.cards.get(&card_id).cloned())
    }

    async fn like_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>> {
        let mut tables = self.lock()?;
        Ok(tables.cards.get_mut(&card_id).map(|card| {
            card.likes_count += 1;
            card.clone()
        }))
    }

    async fn delete_card(&self, card_id: CardId) -> anyhow::Result<()> {
        self.lock()?.cards.remove(&card_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_board(title: &str) -> NewBoard {
        NewBoard {
            title: title.to_owned(),
            owner: "pytest".to_owned(),
            theme: "grey".to_owned(),
        }
    }

    fn new_card(board_id: BoardId, message: &str) -> NewCard {
        NewCard {
            board_id,
            message: message.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryRepository::new();
        let first = repo.create_board(new_board("first")).await.unwrap();
        let second = repo.create_board(new_board("second")).await.unwrap();
        assert_eq!((first.board_id, second.board_id), (1, 2));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryRepository::new();
        repo.create_board(new_board("first")).await.unwrap();
        repo.delete_board(1).await.unwrap();
        let board = repo.create_board(new_board("second")).await.unwrap();
        assert_eq!(board.board_id, 2);
    }

    #[tokio::test]
    async fn test_delete_board_cascades_to_cards() {
        let repo = InMemoryRepository::new();
        repo.create_board(new_board("first")).await.unwrap();
        repo.create_board(new_board("second")).await.unwrap();
        repo.create_card(new_card(1, "a")).await.unwrap();
        repo.create_card(new_card(2, "b")).await.unwrap();
        repo.create_card(new_card(1, "c")).await.unwrap();

        repo.delete_board(1).await.unwrap();

        assert!(repo.get_board(1).await.unwrap().is_none());
        assert!(repo.get_card(1).await.unwrap().is_none());
        assert!(repo.get_card(3).await.unwrap().is_none());
        assert_eq!(repo.list_cards(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_board_includes_cards_in_order() {
        let repo = InMemoryRepository::new();
        repo.create_board(new_board("first")).await.unwrap();
        repo.create_card(new_card(1, "a")).await.unwrap();
        repo.create_card(new_card(1, "b")).await.unwrap();

        let board = repo.get_board(1).await.unwrap().unwrap();
        let messages = board
            .cards
            .iter()
            .map(|c| c.message.as_str())
            .collect::<Vec<_>>();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_create_card_on_missing_board_fails() {
        let repo = InMemoryRepository::new();
        assert!(repo.create_card(new_card(7, "orphan")).await.is_err());
    }

    #[tokio::test]
    async fn test_like_card() {
        let repo = InMemoryRepository::new();
        repo.create_board(new_board("first")).await.unwrap();
        repo.create_card(new_card(1, "a")).await.unwrap();

        repo.like_card(1).await.unwrap();
        let card = repo.like_card(1).await.unwrap().unwrap();

        assert_eq!(card.likes_count, 2);
        assert!(repo.like_card(99).await.unwrap().is_none());
    }
}
