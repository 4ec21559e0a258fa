use thiserror::Error;

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell is outside the grid")]
    InvalidCell,
    #[error("the game has already ended")]
    AlreadyEnded,
    #[error("cashing out requires at least one revealed cell and positive winnings")]
    NothingToCashOut,
}
