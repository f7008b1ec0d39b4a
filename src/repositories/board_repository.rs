use async_trait::async_trait;
use tokio::join;
use worker::D1Database;

use crate::{
    board::{assemble_boards, Board, BoardId, BoardRow, NewBoard},
    card::{Card, CardId, NewCard},
};

/// Storage for boards and the cards they own.
///
/// D1 futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait BoardRepository {
    async fn create_board(&self, board: NewBoard) -> anyhow::Result<Board>;

    async fn list_boards(&self) -> anyhow::Result<Vec<Board>>;

    async fn get_board(&self, board_id: BoardId) -> anyhow::Result<Option<Board>>;

    /// Overwrites the scalar fields of an existing board. Cards are untouched.
    async fn update_board(&self, board: &Board) -> anyhow::Result<()>;

    /// Removes the board and every card it owns.
    async fn delete_board(&self, board_id: BoardId) -> anyhow::Result<()>;

    async fn create_card(&self, card: NewCard) -> anyhow::Result<Card>;

    async fn list_cards(&self, board_id: BoardId) -> anyhow::Result<Vec<Card>>;

    async fn get_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>>;

    /// Increments `likes_count` and returns the updated card.
    async fn like_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>>;

    async fn delete_card(&self, card_id: CardId) -> anyhow::Result<()>;
}

pub struct D1Repository<'a> {
    db: &'a D1Database,
}

impl<'a> D1Repository<'a> {
    pub fn new(db: &'a D1Database) -> D1Repository<'a> {
        D1Repository { db }
    }
}

// D1 numbers are JS doubles; ids stay far below 2^53.
fn id_param(id: i64) -> f64 {
    id as f64
}

#[async_trait(?Send)]
impl BoardRepository for D1Repository<'_> {
    async fn create_board(&self, board: NewBoard) -> anyhow::Result<Board> {
        let Ok(stmt) = self
            .db
            .prepare("INSERT INTO boards (title, owner, theme) VALUES (?, ?, ?) RETURNING *")
            .bind(&[
                board.title.as_str().into(),
                board.owner.as_str().into(),
                board.theme.as_str().into(),
            ])
        else {
            return Err(anyhow::anyhow!("failed to bind title, owner and theme"));
        };
        match stmt.first::<BoardRow>(None).await {
            Ok(Some(row)) => Ok(Board::from_row(row, Vec::new())),
            Ok(None) => Err(anyhow::anyhow!("insert into boards returned no row")),
            Err(e) => Err(anyhow::anyhow!("failed to insert board: {e}")),
        }
    }

    async fn list_boards(&self) -> anyhow::Result<Vec<Board>> {
        let boards_stmt = self
            .db
            .prepare("SELECT board_id, title, owner, theme FROM boards ORDER BY board_id");
        let cards_stmt = self
            .db
            .prepare("SELECT card_id, board_id, message, likes_count FROM cards ORDER BY card_id");

        let (boards, cards) = join!(boards_stmt.all(), cards_stmt.all());
        let rows = boards
            .and_then(|res| res.results::<BoardRow>())
            .map_err(|e| anyhow::anyhow!("failed to fetch boards: {e}"))?;
        let cards = cards
            .and_then(|res| res.results::<Card>())
            .map_err(|e| anyhow::anyhow!("failed to fetch cards: {e}"))?;

        Ok(assemble_boards(rows, cards))
    }

    async fn get_board(&self, board_id: BoardId) -> anyhow::Result<Option<Board>> {
        let Ok(stmt) = self
            .db
            .prepare("SELECT board_id, title, owner, theme FROM boards WHERE board_id = ?")
            .bind(&[id_param(board_id).into()])
        else {
            return Err(anyhow::anyhow!("failed to bind board_id"));
        };
        let row = stmt
            .first::<BoardRow>(None)
            .await
            .map_err(|e| anyhow::anyhow!("failed to fetch board: {e}"))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let cards = self.list_cards(board_id).await?;

        Ok(Some(Board::from_row(row, cards)))
    }

    async fn update_board(&self, board: &Board) -> anyhow::Result<()> {
        let Ok(stmt) = self
            .db
            .prepare("UPDATE boards SET title = ?, owner = ?, theme = ? WHERE board_id = ?")
            .bind(&[
                board.title.as_str().into(),
                board.owner.as_str().into(),
                board.theme.as_str().into(),
                id_param(board.board_id).into(),
            ])
        else {
            return Err(anyhow::anyhow!("failed to bind board update"));
        };
        if let Err(e) = stmt.run().await {
            Err(anyhow::anyhow!("failed to update board: {e}"))
        } else {
            Ok(())
        }
    }

    async fn delete_board(&self, board_id: BoardId) -> anyhow::Result<()> {
        let cards_stmt = self
            .db
            .prepare("DELETE FROM cards WHERE board_id = ?")
            .bind(&[id_param(board_id).into()]);
        let board_stmt = self
            .db
            .prepare("DELETE FROM boards WHERE board_id = ?")
            .bind(&[id_param(board_id).into()]);

        match (cards_stmt, board_stmt) {
            (Ok(cards_stmt), Ok(board_stmt)) => {
                if let Err(e) = self.db.batch(vec![cards_stmt, board_stmt]).await {
                    Err(anyhow::anyhow!("failed to delete board: {e}"))
                } else {
                    Ok(())
                }
            }
            _ => Err(anyhow::anyhow!("failed to bind in board deletion")),
        }
    }

    async fn create_card(&self, card: NewCard) -> anyhow::Result<Card> {
        let Ok(stmt) = self
            .db
            .prepare(
                "INSERT INTO cards (board_id, message, likes_count) VALUES (?, ?, 0)
                RETURNING card_id, board_id, message, likes_count",
            )
            .bind(&[id_param(card.board_id).into(), card.message.as_str().into()])
        else {
            return Err(anyhow::anyhow!("failed to bind board_id and message"));
        };
        match stmt.first::<Card>(None).await {
            Ok(Some(card)) => Ok(card),
            Ok(None) => Err(anyhow::anyhow!("insert into cards returned no row")),
            Err(e) => Err(anyhow::anyhow!("failed to insert card: {e}")),
        }
    }

    async fn list_cards(&self, board_id: BoardId) -> anyhow::Result<Vec<Card>> {
        let Ok(stmt) = self
            .db
            .prepare(
                "SELECT card_id, board_id, message, likes_count FROM cards
                WHERE board_id = ? ORDER BY card_id",
            )
            .bind(&[id_param(board_id).into()])
        else {
            return Err(anyhow::anyhow!("failed to bind board_id"));
        };
        stmt.all()
            .await
            .and_then(|res| res.results::<Card>())
            .map_err(|e| anyhow::anyhow!("failed to fetch cards: {e}"))
    }

    async fn get_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>> {
        let Ok(stmt) = self
            .db
            .prepare("SELECT card_id, board_id, message, likes_count FROM cards WHERE card_id = ?")
            .bind(&[id_param(card_id).into()])
        else {
            return Err(anyhow::anyhow!("failed to bind card_id"));
        };
        stmt.first::<Card>(None)
            .await
            .map_err(|e| anyhow::anyhow!("failed to fetch card: {e}"))
    }

    async fn like_card(&self, card_id: CardId) -> anyhow::Result<Option<Card>> {
        let Ok(stmt) = self
            .db
            .prepare(
                "UPDATE cards SET likes_count = likes_count + 1 WHERE card_id = ?
                RETURNING card_id, board_id, message, likes_count",
            )
            .bind(&[id_param(card_id).into()])
        else {
            return Err(anyhow::anyhow!("failed to bind card_id"));
        };
        stmt.first::<Card>(None)
            .await
            .map_err(|e| anyhow::anyhow!("failed to like card: {e}"))
    }

    async fn delete_card(&self, card_id: CardId) -> anyhow::Result<()> {
        let Ok(stmt) = self
            .db
            .prepare("DELETE FROM cards WHERE card_id = ?")
            .bind(&[id_param(card_id).into()])
        else {
            return Err(anyhow::anyhow!("failed to bind card_id"));
        };
        if let Err(e) = stmt.run().await {
            Err(anyhow::anyhow!("failed to delete card: {e}"))
        } else {
            Ok(())
        }
    }
}
