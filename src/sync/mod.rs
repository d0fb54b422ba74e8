//! Optimistic moves and their reconciliation with the server.
//!
//! A move is split in three steps so the board stays interactive while a
//! request is in flight: [`SyncClient::begin`] mutates the board and returns
//! a [`PendingMove`], [`SyncClient::request_move`] talks to the server, and
//! [`SyncClient::reconcile`] applies or reverts. Every `begin` must be paired
//! with one `reconcile`.

pub mod http;

use crate::domain::{BoardModel, CardId, RenderedCard, Status, UndoMove};
use crate::error::{BoardError, Result};
use crate::interaction::MoveIntent;
use crate::notify::NotificationCenter;
use async_trait::async_trait;
use std::sync::Arc;

pub use http::HttpMoveEndpoint;

/// Shown when the server gives no readable reason
pub const GENERIC_FAILURE: &str = "Failed to update task status. Please try again.";

/// Transport for a single move request.
///
/// Returns the raw success body, or an error for network failures and
/// non-success responses.
#[async_trait]
pub trait MoveEndpoint: Send + Sync {
    async fn send_move(&self, card_id: &CardId, target: Status) -> Result<String>;
}

/// Outcome of one move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// The server accepted the move. `None` when its body held no card element.
    Applied(Option<RenderedCard>),
    /// The move failed; carries the message to show the user
    Rejected(String),
}

/// An optimistic move waiting for the server's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub intent: MoveIntent,
    pub undo: UndoMove,
}

/// How a pending move was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Applied,
    /// Accepted by the server, but the optimistic card was kept
    AppliedUnrendered,
    Reverted,
    /// The card or its original column was no longer on the board; only the
    /// notification fired
    Detached,
}

#[derive(Clone)]
pub struct SyncClient {
    endpoint: Arc<dyn MoveEndpoint>,
}

impl SyncClient {
    pub fn new(endpoint: Arc<dyn MoveEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Applies the move to the board ahead of the request
    pub fn begin(board: &mut BoardModel, intent: MoveIntent) -> Result<PendingMove> {
        let undo = board.move_card_optimistically(&intent.card_id, intent.to)?;
        Ok(PendingMove { intent, undo })
    }

    /// Issues exactly one request; never retries
    pub async fn request_move(&self, card_id: &CardId, target: Status) -> MoveResult {
        match self.endpoint.send_move(card_id, target).await {
            Ok(body) => {
                let rendered = RenderedCard::parse(&body);
                if rendered.is_none() {
                    tracing::warn!(card_id = %card_id, "Move succeeded but response held no card markup");
                }
                MoveResult::Applied(rendered)
            }
            Err(BoardError::MalformedResponse(reason)) => {
                tracing::warn!(card_id = %card_id, %reason, "Move succeeded but response body was unreadable");
                MoveResult::Applied(None)
            }
            Err(BoardError::ServerRejected { status, message }) => {
                tracing::warn!(card_id = %card_id, status, %message, "Server rejected move");
                MoveResult::Rejected(message)
            }
            Err(err) => {
                tracing::warn!(card_id = %card_id, error = %err, "Move request failed");
                MoveResult::Rejected(GENERIC_FAILURE.to_string())
            }
        }
    }

    /// Settles a pending move. The board is updated before the notification
    /// is shown, so a notice never describes a state that was rolled back.
    pub fn reconcile(
        board: &mut BoardModel,
        notifications: &mut NotificationCenter,
        pending: &PendingMove,
        result: MoveResult,
    ) -> Result<Reconciliation> {
        let card_id = &pending.intent.card_id;
        if board.card(card_id).is_none() {
            tracing::warn!(card_id = %card_id, "Card left the board before its move settled");
            match result {
                MoveResult::Applied(_) => notifications
                    .show_success(format!("Task moved to {}", pending.intent.to.label())),
                MoveResult::Rejected(message) => notifications.show_error(message),
            }
            return Ok(Reconciliation::Detached);
        }

        let outcome = match result {
            MoveResult::Applied(Some(rendered)) => {
                if let Some(rendered_id) = &rendered.id {
                    if rendered_id != card_id {
                        tracing::warn!(card_id = %card_id, %rendered_id, "Replacement card has a different ID");
                    }
                }
                board.replace_card(card_id, &rendered)?;
                board.recount_all();
                let status = board
                    .card(card_id)
                    .map(|card| card.status)
                    .unwrap_or(pending.intent.to);
                notifications.show_success(format!("Task moved to {}", status.label()));
                Reconciliation::Applied
            }
            MoveResult::Applied(None) => {
                board.recount_all();
                notifications.show_success(format!("Task moved to {}", pending.intent.to.label()));
                Reconciliation::AppliedUnrendered
            }
            MoveResult::Rejected(message) => {
                let outcome = match board.undo(&pending.undo) {
                    Ok(()) => Reconciliation::Reverted,
                    Err(err) => {
                        tracing::warn!(card_id = %card_id, error = %err, "Could not roll back rejected move");
                        Reconciliation::Detached
                    }
                };
                board.recount_all();
                notifications.show_error(message);
                outcome
            }
        };

        tracing::debug!(card_id = %card_id, ?outcome, "Move reconciled");
        Ok(outcome)
    }
}
