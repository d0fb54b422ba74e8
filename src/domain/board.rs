use crate::domain::card::{Card, CardId};
use crate::domain::markup::RenderedCard;
use crate::domain::status::Status;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A board lane holding every card in one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub status: Status,
    pub cards: Vec<CardId>,
    /// Displayed cardinality, only ever refreshed by `BoardModel::recount_all`
    pub count: usize,
}

impl Column {
    pub fn new(name: String, status: Status) -> Self {
        Self {
            name,
            status,
            cards: Vec::new(),
            count: 0,
        }
    }

    fn position_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| card == id)
    }
}

/// Column entry of a rendered board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub status: Status,
    #[serde(default)]
    pub name: Option<String>,
}

/// What the page rendered: columns in display order and cards in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<ColumnSnapshot>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl BoardSnapshot {
    /// Parses a snapshot from the JSON payload embedded in the page
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Everything needed to put a card back exactly where it was before a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoMove {
    pub card_id: CardId,
    pub previous_status: Status,
    pub previous_position: usize,
}

/// In-memory mirror of the rendered board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardModel {
    columns: Vec<Column>,
    cards: HashMap<CardId, Card>,
}

impl BoardModel {
    /// Builds the model from a rendered snapshot.
    ///
    /// Cards whose status has no column, and duplicate columns or cards, are
    /// skipped so that every card sits in the column of its status.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut board = Self::default();

        for column in snapshot.columns {
            if board.column_index(column.status).is_some() {
                tracing::warn!(status = %column.status.as_str(), "Skipping duplicate column");
                continue;
            }
            let name = column
                .name
                .unwrap_or_else(|| column.status.label().to_string());
            board.columns.push(Column::new(name, column.status));
        }

        for card in snapshot.cards {
            if board.cards.contains_key(&card.id) {
                tracing::warn!(card_id = %card.id, "Skipping duplicate card");
                continue;
            }
            let Some(index) = board.column_index(card.status) else {
                tracing::warn!(
                    card_id = %card.id,
                    status = %card.status.as_str(),
                    "Skipping card without a matching column"
                );
                continue;
            };
            board.columns[index].cards.push(card.id.clone());
            board.cards.insert(card.id.clone(), card);
        }

        board.recount_all();
        board
    }

    /// Columns in display order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|col| col.status == status)
    }

    pub fn column_index(&self, status: Status) -> Option<usize> {
        self.columns.iter().position(|col| col.status == status)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Status of the column whose membership includes the card
    pub fn column_of(&self, id: &CardId) -> Option<Status> {
        self.columns
            .iter()
            .find(|col| col.cards.contains(id))
            .map(|col| col.status)
    }

    /// Displayed count for the column of `status`, zero if there is none
    pub fn count(&self, status: Status) -> usize {
        self.column(status).map(|col| col.count).unwrap_or(0)
    }

    /// Moves a card to the column for `target` ahead of server confirmation.
    ///
    /// The returned [`UndoMove`] restores exactly this mutation.
    pub fn move_card_optimistically(&mut self, id: &CardId, target: Status) -> Result<UndoMove> {
        let card = self.card_or_err(id)?;
        let previous_status = card.status;
        self.column_index(target)
            .ok_or_else(|| BoardError::ColumnNotFound(target.as_str().to_string()))?;
        let previous_position = self
            .column(previous_status)
            .and_then(|col| col.position_of(id))
            .unwrap_or(0);

        self.relocate(id, target, None)?;
        tracing::debug!(
            card_id = %id,
            from = %previous_status.as_str(),
            to = %target.as_str(),
            "Applied optimistic move"
        );

        Ok(UndoMove {
            card_id: id.clone(),
            previous_status,
            previous_position,
        })
    }

    /// Puts a card back in the column for `to_status`.
    ///
    /// Does nothing if the card is already there.
    pub fn revert_card(&mut self, id: &CardId, to_status: Status) -> Result<()> {
        let card = self.card_or_err(id)?;
        if card.status == to_status && self.column_of(id) == Some(to_status) {
            return Ok(());
        }
        self.relocate(id, to_status, None)
    }

    /// Reverts an optimistic move, restoring the original position in the column
    pub fn undo(&mut self, undo: &UndoMove) -> Result<()> {
        let card = self.card_or_err(&undo.card_id)?;
        let in_place = card.status == undo.previous_status
            && self
                .column(undo.previous_status)
                .and_then(|col| col.position_of(&undo.card_id))
                == Some(undo.previous_position);
        if in_place {
            return Ok(());
        }
        self.relocate(&undo.card_id, undo.previous_status, Some(undo.previous_position))?;
        tracing::debug!(
            card_id = %undo.card_id,
            status = %undo.previous_status.as_str(),
            "Reverted optimistic move"
        );
        Ok(())
    }

    /// Swaps in the server's rendering of a card.
    ///
    /// The server is authoritative: if it reports a different status than the
    /// card currently shows, the card follows it to that column.
    pub fn replace_card(&mut self, id: &CardId, rendered: &RenderedCard) -> Result<()> {
        let current = self.card_or_err(id)?.status;
        let mut status = rendered.status.unwrap_or(current);

        if status != current && self.column_index(status).is_none() {
            tracing::warn!(
                card_id = %id,
                status = %status.as_str(),
                "Server reported a status with no column, keeping card in place"
            );
            status = current;
        }
        if status != current {
            self.relocate(id, status, None)?;
        }

        if let Some(card) = self.cards.get_mut(id) {
            card.markup = rendered.markup.clone();
            if let Some(is_personal) = rendered.is_personal {
                card.is_personal = is_personal;
            }
        }
        Ok(())
    }

    /// Recomputes every column's count from its membership
    pub fn recount_all(&mut self) {
        for column in &mut self.columns {
            column.count = column.cards.len();
        }
    }

    /// Checks that every card sits exactly once in the column of its status
    /// and that the displayed counts match membership
    pub fn is_consistent(&self) -> bool {
        let placed: usize = self.columns.iter().map(|col| col.cards.len()).sum();
        placed == self.cards.len()
            && self.columns.iter().all(|col| {
                col.count == col.cards.len()
                    && col.cards.iter().all(|id| {
                        self.cards
                            .get(id)
                            .map(|card| card.status == col.status)
                            .unwrap_or(false)
                    })
            })
    }

    fn card_or_err(&self, id: &CardId) -> Result<&Card> {
        self.cards
            .get(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))
    }

    // Single mutation point for membership and status, so both change together.
    fn relocate(&mut self, id: &CardId, status: Status, position: Option<usize>) -> Result<()> {
        let target = self
            .column_index(status)
            .ok_or_else(|| BoardError::ColumnNotFound(status.as_str().to_string()))?;
        let card = self
            .cards
            .get_mut(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?;

        for column in &mut self.columns {
            column.cards.retain(|member| member != id);
        }
        let cards = &mut self.columns[target].cards;
        let index = position.unwrap_or(cards.len()).min(cards.len());
        cards.insert(index, id.clone());
        card.status = status;

        self.recount_all();
        Ok(())
    }
}
