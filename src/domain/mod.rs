pub mod board;
pub mod card;
pub mod markup;
pub mod status;
pub mod transitions;

pub use board::{BoardModel, BoardSnapshot, Column, ColumnSnapshot, UndoMove};
pub use card::{Card, CardId};
pub use markup::{scan_board, RenderedCard};
pub use status::Status;
pub use transitions::TransitionGraph;
