use crate::config::ClientConfig;
use crate::domain::{BoardModel, BoardSnapshot, CardId, Status, TransitionGraph};
use crate::error::Result;
use crate::interaction::{
    BoardView, DragController, Effect, HeadlessView, Key, KeyboardController,
};
use crate::notify::NotificationCenter;
use crate::sync::{MoveEndpoint, MoveResult, PendingMove, Reconciliation, SyncClient};
use std::sync::Arc;

/// One board on one page: the model, both input controllers, notifications
/// and the link to the server.
///
/// Interaction methods are synchronous. Those that can start a move return
/// the [`PendingMove`] after the optimistic mutation; settle it with
/// [`settle`](Self::settle), or send it yourself through
/// [`sync_client`](Self::sync_client) and pass the answer to
/// [`reconcile`](Self::reconcile) so other interactions can run meanwhile.
pub struct KanbanSession<V: BoardView = HeadlessView> {
    board: BoardModel,
    graph: TransitionGraph,
    drag: DragController,
    keyboard: KeyboardController,
    notifications: NotificationCenter,
    sync: SyncClient,
    view: V,
}

impl<V: BoardView> KanbanSession<V> {
    pub fn new(
        graph: TransitionGraph,
        snapshot: BoardSnapshot,
        notifications: NotificationCenter,
        sync: SyncClient,
        view: V,
    ) -> Self {
        Self {
            board: BoardModel::from_snapshot(snapshot),
            graph,
            drag: DragController::new(),
            keyboard: KeyboardController::new(),
            notifications,
            sync,
            view,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        snapshot: BoardSnapshot,
        endpoint: Arc<dyn MoveEndpoint>,
        view: V,
    ) -> Self {
        Self::new(
            config.transition_graph(),
            snapshot,
            config.notification_center(),
            SyncClient::new(endpoint),
            view,
        )
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn keyboard(&self) -> &KeyboardController {
        &self.keyboard
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// A handle for issuing requests while the session stays borrowable
    pub fn sync_client(&self) -> SyncClient {
        self.sync.clone()
    }

    pub fn drag_start(&mut self, card_id: &CardId) -> Result<()> {
        let effects = self.drag.drag_start(&self.board, &self.graph, card_id)?;
        self.dispatch(effects)?;
        Ok(())
    }

    pub fn drag_over(&mut self, column: Status) -> Result<()> {
        let effects = self.drag.drag_over(column);
        self.dispatch(effects)?;
        Ok(())
    }

    pub fn drag_leave(&mut self, column: Status, still_inside: bool) -> Result<()> {
        let effects = self.drag.drag_leave(column, still_inside);
        self.dispatch(effects)?;
        Ok(())
    }

    pub fn drop(&mut self, column: Status) -> Result<Option<PendingMove>> {
        let effects = self.drag.drop(&self.board, &self.graph, column);
        self.dispatch(effects)
    }

    pub fn drag_end(&mut self) -> Result<()> {
        let effects = self.drag.drag_end();
        self.dispatch(effects)?;
        Ok(())
    }

    /// Selects a card for keyboard movement
    pub fn activate(&mut self, card_id: &CardId) -> Result<()> {
        let effects = self.keyboard.activate(&self.board, card_id)?;
        self.dispatch(effects)?;
        Ok(())
    }

    pub fn press(&mut self, key: Key) -> Result<Option<PendingMove>> {
        let effects = self.keyboard.press(&self.board, &self.graph, key);
        self.dispatch(effects)
    }

    /// Applies or reverts a pending move with the server's answer
    pub fn reconcile(&mut self, pending: &PendingMove, result: MoveResult) -> Result<Reconciliation> {
        SyncClient::reconcile(&mut self.board, &mut self.notifications, pending, result)
    }

    /// Sends a pending move and reconciles the answer
    pub async fn settle(&mut self, pending: PendingMove) -> Result<Reconciliation> {
        let client = self.sync.clone();
        let result = client
            .request_move(&pending.intent.card_id, pending.intent.to)
            .await;
        self.reconcile(&pending, result)
    }

    /// Re-reads the board after the page swapped in new markup.
    ///
    /// Drops any drag or keyboard selection, since the elements they pointed
    /// at may be gone.
    pub fn rescan(&mut self, snapshot: BoardSnapshot) -> Result<()> {
        let mut effects = self.drag.drag_end();
        if let Some(card_id) = self.keyboard.armed_card() {
            effects.push(Effect::DisarmCard(card_id.clone()));
        }
        self.keyboard.reset();
        self.dispatch(effects)?;

        self.board = BoardModel::from_snapshot(snapshot);
        tracing::debug!(columns = self.board.columns().len(), "Board re-scanned");
        Ok(())
    }

    fn dispatch(&mut self, effects: Vec<Effect>) -> Result<Option<PendingMove>> {
        let mut pending = None;
        for effect in effects {
            match effect {
                Effect::Move(intent) => {
                    pending = Some(SyncClient::begin(&mut self.board, intent)?);
                }
                Effect::Reject(reason) => self.notifications.show_error(reason.to_string()),
                visual => self.view.apply(&visual),
            }
        }
        Ok(pending)
    }
}
