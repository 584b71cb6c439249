use std::ops::Range;
use std::time::Duration;

use strum::EnumCount;

use crate::card::CardColor;

// One zero per color, two of each digit 1 through 9.
pub(crate) const NUMBER_CARDS_PER_COLOR: &[u8] =
    &[0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9];
pub(crate) const SKIP_CARDS_PER_COLOR: u8 = 2;
pub(crate) const REVERSE_CARDS_PER_COLOR: u8 = 2;
pub(crate) const DRAW_TWO_CARDS_PER_COLOR: u8 = 2;

pub(crate) const NUMBER_CARDS_IN_DECK: u8 = (NUMBER_CARDS_PER_COLOR.len() * CardColor::COUNT) as u8;
pub(crate) const SKIP_CARDS_IN_DECK: u8 = SKIP_CARDS_PER_COLOR * CardColor::COUNT as u8;
pub(crate) const REVERSE_CARDS_IN_DECK: u8 = REVERSE_CARDS_PER_COLOR * CardColor::COUNT as u8;
pub(crate) const DRAW_TWO_CARDS_IN_DECK: u8 = DRAW_TWO_CARDS_PER_COLOR * CardColor::COUNT as u8;

pub(crate) const WILD_CARDS_IN_DECK: u8 = 4;
pub(crate) const WILD_DRAW_FOUR_CARDS_IN_DECK: u8 = 4;

pub(crate) const TOTAL_CARDS_IN_DECK: u8 = NUMBER_CARDS_IN_DECK
    + SKIP_CARDS_IN_DECK
    + REVERSE_CARDS_IN_DECK
    + DRAW_TWO_CARDS_IN_DECK
    + WILD_CARDS_IN_DECK
    + WILD_DRAW_FOUR_CARDS_IN_DECK;

pub(crate) const OPENING_HAND_SIZE: usize = 5;

/// Simulated thinking time before the machine takes its scheduled turn.
pub(crate) const MACHINE_TURN_DELAY_MS: Range<u64> = 3000..4000;

/// Grace period for calling UNO once a hand drops to a single card.
pub(crate) const UNO_GRACE_PERIOD: Duration = Duration::from_secs(4);

/// Presentational pause between the winning play and the game-over
/// notification.
pub(crate) const GAME_OVER_PAUSE: Duration = Duration::from_secs(1);
