//! A two-player UNO engine: one human seat driven by a presentation
//! layer, one automated opponent, and the timers that pace them.
//!
//! [`game::Game`] is the synchronous rules engine; [`session::Session`]
//! wraps it in a tokio lock and owns the delayed machine turns, the UNO
//! grace-period countdown, and the game-over pacing. The boundary layer
//! sends commands in and drains [`observer::GameEvent`]s out.

pub mod card;
pub(crate) mod constants;
pub mod deck;
pub mod error;
pub mod game;
pub mod machine;
pub mod observer;
pub mod player;
pub mod session;
