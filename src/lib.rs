//! # Taskboard Core
//!
//! Interaction core for a kanban task board: moving cards between status
//! columns by pointer drag or keyboard, checking each move against the
//! allowed status transitions, applying it optimistically and reconciling
//! with the server.
//!
//! The state machines are pure and emit effects; rendering and the HTTP
//! transport sit behind the [`BoardView`] and [`MoveEndpoint`] traits.

pub mod config;
pub mod domain;
pub mod error;
pub mod interaction;
pub mod notify;
pub mod session;
pub mod sync;

// Re-export commonly used types
pub use config::ClientConfig;
pub use domain::{
    board::{BoardModel, BoardSnapshot, Column},
    card::{Card, CardId},
    markup::RenderedCard,
    status::Status,
    transitions::TransitionGraph,
};
pub use error::{BoardError, IllegalMove, Result};
pub use interaction::{attempt_move, BoardView, Effect, HeadlessView, Key, MoveOutcome};
pub use notify::{Notice, NoticeKind, NotificationCenter};
pub use session::KanbanSession;
pub use sync::{HttpMoveEndpoint, MoveEndpoint, MoveResult, PendingMove, SyncClient};
