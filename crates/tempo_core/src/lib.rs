pub mod board;
pub mod deadline;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod types;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use deadline::Deadline;
pub use error::{FenError, NotationError};
pub use movegen::*;
pub use notation::*;
pub use perft::{divide, perft};
pub use types::*;
pub use zobrist::{ZOBRIST, signature};
