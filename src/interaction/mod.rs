//! Pointer and keyboard state machines.
//!
//! Both controllers are pure: they read the board, decide, and hand back a
//! list of [`Effect`]s. Applying visual effects is the job of a
//! [`BoardView`](view::BoardView); moves are carried out by the session.

pub mod drag;
pub mod keyboard;
pub mod view;

use crate::domain::{Card, CardId, Status, TransitionGraph};
use crate::error::IllegalMove;

pub use drag::{DragController, DragSession, DragState};
pub use keyboard::{Key, KeyboardController, KeyboardState};
pub use view::{BoardView, HeadlessView};

/// A request to move one card, already cleared by [`attempt_move`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub card_id: CardId,
    pub from: Status,
    pub to: Status,
}

/// Result of checking a move against the board rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Apply(MoveIntent),
    /// Target is the card's own column
    NoOp,
    Blocked(IllegalMove),
}

/// The one legality check shared by every input method.
///
/// Dropping a card on its own column is never an error, and a personal
/// completed card stays put whatever the graph says.
pub fn attempt_move(graph: &TransitionGraph, card: &Card, target: Status) -> MoveOutcome {
    if card.status == target {
        return MoveOutcome::NoOp;
    }
    if card.is_locked() {
        return MoveOutcome::Blocked(IllegalMove::PersonalCompleted);
    }
    if !graph.is_allowed(card.status, target) {
        return MoveOutcome::Blocked(IllegalMove::InvalidTransition {
            from: card.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }
    MoveOutcome::Apply(MoveIntent {
        card_id: card.id.clone(),
        from: card.status,
        to: target,
    })
}

/// Columns a card may be dropped on, honoring the personal lock
pub fn reachable_columns(graph: &TransitionGraph, card: &Card) -> Vec<Status> {
    if card.is_locked() {
        return Vec::new();
    }
    graph.targets(card.status).into_iter().collect()
}

/// What a controller asks the outside world to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LiftCard(CardId),
    HighlightColumns(Vec<Status>),
    Hover { column: Status, accepting: bool },
    ClearHover(Status),
    /// Drop every drag affordance: lifted card, highlights, hovers
    ClearDrag,
    ArmCard(CardId),
    FocusColumn(Status),
    DisarmCard(CardId),
    Move(MoveIntent),
    Reject(IllegalMove),
}
