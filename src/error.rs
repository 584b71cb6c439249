use thiserror::Error;

use crate::card::CardColor;

/// Everything the engine can reject an action with. All variants are
/// recoverable at the action boundary: the action is refused, state is
/// left untouched, and the message is suitable for showing to the player.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("that card cannot be played here")]
    IllegalCard,
    #[error("you must play a {0} card")]
    WrongColor(CardColor),
    #[error("that card is not in your hand")]
    CardNotFound,
    #[error("no color was chosen for the wild card")]
    MissingColorChoice,
    #[error("no card has been selected")]
    NoCardSelected,
    #[error("the draw pile is empty and the discard pile has too few cards to reshuffle")]
    EmptyDeck,
    #[error("the discard pile is empty")]
    EmptyPile,
    #[error("the game is already over")]
    GameOver,
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
