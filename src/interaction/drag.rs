use crate::domain::{BoardModel, CardId, Status, TransitionGraph};
use crate::error::{BoardError, Result};
use crate::interaction::{attempt_move, reachable_columns, Effect, MoveOutcome};

/// The card being dragged, alive from drag-start until drop or drag-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub card_id: CardId,
    pub source_column: Status,
    pub source_status: Status,
    /// Computed once at drag-start; the graph does not change mid-session
    pub reachable: Vec<Status>,
}

impl DragSession {
    pub fn accepts(&self, column: Status) -> bool {
        self.reachable.contains(&column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    HoveringValidTarget { session: DragSession, column: Status },
    HoveringInvalidTarget { session: DragSession, column: Status },
}

impl DragState {
    fn into_session(self) -> Option<DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session)
            | Self::HoveringValidTarget { session, .. }
            | Self::HoveringInvalidTarget { session, .. } => Some(session),
        }
    }

    fn hovered(&self) -> Option<Status> {
        match self {
            Self::HoveringValidTarget { column, .. } | Self::HoveringInvalidTarget { column, .. } => {
                Some(*column)
            }
            _ => None,
        }
    }
}

/// Pointer drag-and-drop lifecycle
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The live session, if a drag is in progress
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(session)
            | DragState::HoveringValidTarget { session, .. }
            | DragState::HoveringInvalidTarget { session, .. } => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Lifts a card and highlights every column it may land in
    pub fn drag_start(
        &mut self,
        board: &BoardModel,
        graph: &TransitionGraph,
        card_id: &CardId,
    ) -> Result<Vec<Effect>> {
        let card = board
            .card(card_id)
            .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;
        let source_column = board
            .column_of(card_id)
            .ok_or_else(|| BoardError::ColumnNotFound(card.status.as_str().to_string()))?;

        let mut effects = Vec::new();
        if let Some(stale) = std::mem::take(&mut self.state).into_session() {
            tracing::warn!(card_id = %stale.card_id, "Drag started without a drag-end, discarding old session");
            effects.push(Effect::ClearDrag);
        }

        let session = DragSession {
            card_id: card_id.clone(),
            source_column,
            source_status: card.status,
            reachable: reachable_columns(graph, card),
        };
        tracing::debug!(
            card_id = %card_id,
            status = %card.status.as_str(),
            targets = session.reachable.len(),
            "Drag started"
        );

        effects.push(Effect::LiftCard(card_id.clone()));
        effects.push(Effect::HighlightColumns(session.reachable.clone()));
        self.state = DragState::Dragging(session);
        Ok(effects)
    }

    /// Pointer moved over a column; only the affordance changes
    pub fn drag_over(&mut self, column: Status) -> Vec<Effect> {
        let previous = self.state.hovered();
        if previous == Some(column) {
            return Vec::new();
        }
        let Some(session) = std::mem::take(&mut self.state).into_session() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if let Some(previous) = previous {
            effects.push(Effect::ClearHover(previous));
        }

        let accepting = session.accepts(column);
        effects.push(Effect::Hover { column, accepting });
        self.state = if accepting {
            DragState::HoveringValidTarget { session, column }
        } else {
            DragState::HoveringInvalidTarget { session, column }
        };
        effects
    }

    /// Pointer left a column.
    ///
    /// `still_inside` is true when the pointer only crossed into a child
    /// element of the column; that is not a leave.
    pub fn drag_leave(&mut self, column: Status, still_inside: bool) -> Vec<Effect> {
        if still_inside || self.state.hovered() != Some(column) {
            return Vec::new();
        }
        match std::mem::take(&mut self.state).into_session() {
            Some(session) => {
                self.state = DragState::Dragging(session);
                vec![Effect::ClearHover(column)]
            }
            None => Vec::new(),
        }
    }

    /// Card released over a column. Always ends the session.
    pub fn drop(
        &mut self,
        board: &BoardModel,
        graph: &TransitionGraph,
        column: Status,
    ) -> Vec<Effect> {
        let Some(session) = std::mem::take(&mut self.state).into_session() else {
            return Vec::new();
        };

        let mut effects = vec![Effect::ClearDrag];
        let Some(card) = board.card(&session.card_id) else {
            tracing::warn!(card_id = %session.card_id, "Dropped card is no longer on the board");
            return effects;
        };

        match attempt_move(graph, card, column) {
            MoveOutcome::Apply(intent) => effects.push(Effect::Move(intent)),
            MoveOutcome::NoOp => {
                tracing::debug!(card_id = %card.id, "Dropped on own column");
            }
            MoveOutcome::Blocked(reason) => {
                tracing::debug!(card_id = %card.id, to = %column.as_str(), %reason, "Drop rejected");
                effects.push(Effect::Reject(reason));
            }
        }
        effects
    }

    /// Drag finished or was cancelled, wherever the pointer is
    pub fn drag_end(&mut self) -> Vec<Effect> {
        self.state = DragState::Idle;
        vec![Effect::ClearDrag]
    }
}
