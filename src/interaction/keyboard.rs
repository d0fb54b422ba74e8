use crate::domain::{BoardModel, CardId, TransitionGraph};
use crate::error::{BoardError, Result};
use crate::interaction::{attempt_move, Effect, MoveOutcome};

/// Keys the keyboard mover understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Confirm,
    Cancel,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Self::Left),
            "ArrowRight" | "Right" => Some(Self::Right),
            "Enter" | " " | "Space" | "Spacebar" => Some(Self::Confirm),
            "Escape" | "Esc" => Some(Self::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyboardState {
    #[default]
    Inactive,
    /// `focus` indexes the board's columns and is only tentative until confirm
    Armed { card_id: CardId, focus: usize },
}

/// Moves cards between columns without a pointer
#[derive(Debug, Default)]
pub struct KeyboardController {
    state: KeyboardState,
}

impl KeyboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn armed_card(&self) -> Option<&CardId> {
        match &self.state {
            KeyboardState::Armed { card_id, .. } => Some(card_id),
            KeyboardState::Inactive => None,
        }
    }

    /// Selects a card for keyboard movement, focusing its own column
    pub fn activate(&mut self, board: &BoardModel, card_id: &CardId) -> Result<Vec<Effect>> {
        let column = board
            .column_of(card_id)
            .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;
        let focus = board
            .column_index(column)
            .ok_or_else(|| BoardError::ColumnNotFound(column.as_str().to_string()))?;

        let mut effects = Vec::new();
        if let Some(previous) = self.armed_card() {
            effects.push(Effect::DisarmCard(previous.clone()));
        }
        effects.push(Effect::ArmCard(card_id.clone()));
        effects.push(Effect::FocusColumn(column));

        self.state = KeyboardState::Armed {
            card_id: card_id.clone(),
            focus,
        };
        Ok(effects)
    }

    pub fn press(&mut self, board: &BoardModel, graph: &TransitionGraph, key: Key) -> Vec<Effect> {
        let KeyboardState::Armed { card_id, focus } = &mut self.state else {
            return Vec::new();
        };

        match key {
            Key::Left | Key::Right => {
                let last = board.columns().len().saturating_sub(1);
                let next = match key {
                    Key::Left => focus.saturating_sub(1),
                    _ => (*focus + 1).min(last),
                };
                if next == *focus {
                    return Vec::new();
                }
                *focus = next;
                board
                    .columns()
                    .get(next)
                    .map(|col| vec![Effect::FocusColumn(col.status)])
                    .unwrap_or_default()
            }
            Key::Cancel => {
                let card_id = card_id.clone();
                self.state = KeyboardState::Inactive;
                vec![Effect::DisarmCard(card_id)]
            }
            Key::Confirm => {
                let card_id = card_id.clone();
                let target = board.columns().get(*focus).map(|col| col.status);
                self.state = KeyboardState::Inactive;

                let mut effects = vec![Effect::DisarmCard(card_id.clone())];
                let (Some(card), Some(target)) = (board.card(&card_id), target) else {
                    tracing::warn!(card_id = %card_id, "Armed card or focused column vanished");
                    return effects;
                };
                match attempt_move(graph, card, target) {
                    MoveOutcome::Apply(intent) => effects.push(Effect::Move(intent)),
                    MoveOutcome::NoOp => {}
                    MoveOutcome::Blocked(reason) => effects.push(Effect::Reject(reason)),
                }
                effects
            }
        }
    }

    /// Forgets any armed card; used when the board is re-scanned
    pub fn reset(&mut self) {
        self.state = KeyboardState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardSnapshot, Card, ColumnSnapshot, Status};
    use crate::error::IllegalMove;
    use std::str::FromStr;

    fn id(raw: &str) -> CardId {
        CardId::from_str(raw).unwrap()
    }

    fn graph() -> TransitionGraph {
        TransitionGraph::new([
            (Status::Todo, vec![Status::InProgress]),
            (Status::InProgress, vec![Status::Review, Status::Todo]),
            (Status::Review, vec![Status::Completed, Status::InProgress]),
        ])
    }

    fn board() -> BoardModel {
        let columns = [Status::Todo, Status::InProgress, Status::Review, Status::Completed]
            .into_iter()
            .map(|status| ColumnSnapshot { status, name: None })
            .collect();
        BoardModel::from_snapshot(BoardSnapshot {
            columns,
            cards: vec![
                Card::new(id("1"), Status::Todo),
                Card::new(id("2"), Status::InProgress),
                Card::new(id("3"), Status::Completed).personal(),
            ],
        })
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key_name("Enter"), Some(Key::Confirm));
        assert_eq!(Key::from_key_name(" "), Some(Key::Confirm));
        assert_eq!(Key::from_key_name("Escape"), Some(Key::Cancel));
        assert_eq!(Key::from_key_name("Tab"), None);
    }

    #[test]
    fn test_activate_focuses_own_column() {
        let mut keys = KeyboardController::new();
        let effects = keys.activate(&board(), &id("2")).unwrap();

        assert_eq!(
            effects,
            vec![Effect::ArmCard(id("2")), Effect::FocusColumn(Status::InProgress)]
        );
        assert_eq!(
            keys.state(),
            &KeyboardState::Armed { card_id: id("2"), focus: 1 }
        );
    }

    #[test]
    fn test_arrows_move_focus_without_moving_card() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("2")).unwrap();

        assert_eq!(
            keys.press(&board, &graph(), Key::Right),
            vec![Effect::FocusColumn(Status::Review)]
        );
        assert_eq!(
            keys.press(&board, &graph(), Key::Right),
            vec![Effect::FocusColumn(Status::Completed)]
        );
        // Clamped at the last column
        assert!(keys.press(&board, &graph(), Key::Right).is_empty());
        assert_eq!(board.card(&id("2")).unwrap().status, Status::InProgress);
    }

    #[test]
    fn test_confirm_on_reachable_column_emits_move() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("2")).unwrap();
        keys.press(&board, &graph(), Key::Right);

        let effects = keys.press(&board, &graph(), Key::Confirm);
        assert_eq!(effects[0], Effect::DisarmCard(id("2")));
        assert!(matches!(&effects[1], Effect::Move(intent) if intent.to == Status::Review));
        assert_eq!(keys.state(), &KeyboardState::Inactive);
    }

    #[test]
    fn test_confirm_without_moving_focus_is_noop() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("2")).unwrap();

        let effects = keys.press(&board, &graph(), Key::Confirm);
        assert_eq!(effects, vec![Effect::DisarmCard(id("2"))]);
    }

    #[test]
    fn test_confirm_on_unreachable_column_rejects() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("1")).unwrap();
        keys.press(&board, &graph(), Key::Right);
        keys.press(&board, &graph(), Key::Right);

        let effects = keys.press(&board, &graph(), Key::Confirm);
        assert!(matches!(
            &effects[1],
            Effect::Reject(IllegalMove::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_personal_completed_card_is_blocked() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("3")).unwrap();
        keys.press(&board, &graph(), Key::Left);

        let effects = keys.press(&board, &graph(), Key::Confirm);
        assert_eq!(
            effects,
            vec![
                Effect::DisarmCard(id("3")),
                Effect::Reject(IllegalMove::PersonalCompleted)
            ]
        );
    }

    #[test]
    fn test_cancel_discards_focus() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("2")).unwrap();
        keys.press(&board, &graph(), Key::Left);

        assert_eq!(
            keys.press(&board, &graph(), Key::Cancel),
            vec![Effect::DisarmCard(id("2"))]
        );
        assert_eq!(keys.state(), &KeyboardState::Inactive);
        assert!(keys.press(&board, &graph(), Key::Confirm).is_empty());
    }

    #[test]
    fn test_activating_another_card_disarms_the_first() {
        let board = board();
        let mut keys = KeyboardController::new();
        keys.activate(&board, &id("1")).unwrap();

        let effects = keys.activate(&board, &id("2")).unwrap();
        assert_eq!(effects[0], Effect::DisarmCard(id("1")));
        assert_eq!(keys.armed_card(), Some(&id("2")));
    }
}
