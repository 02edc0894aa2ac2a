pub mod board;
pub mod card;
pub mod column;
pub mod error;
pub mod validation;

pub use board::Board;
pub use card::{Block, Card};
pub use column::{BoardColumn, ColumnKind};
pub use error::KanbanError;
pub use validation::{Validate, Violation};
