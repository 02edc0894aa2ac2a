pub mod boards;
pub mod cards;

pub use boards::{
    AddColumnRequest, BoardResponse, BoardSummary, ColumnSummary, CreateBoardRequest,
    RenameBoardRequest,
};
pub use cards::{CardMove, CardResponse, CreateCardRequest, ReasonRequest, UpdateCardRequest};
