//! The automated opponent's decision rules. The legality check is
//! deliberately a local reimplementation of the engine's validation so the
//! machine can pick a move without touching game state.

use rand::{seq::SliceRandom, thread_rng};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::card::{Card, CardColor};

/// What the machine decided to do with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnChoice {
    Play(Card),
    Draw,
}

/// Whether `card` may legally be played on `top`. When the showing card is
/// a wild, the constraint in force is the separately tracked active color;
/// otherwise the general similarity rule applies. Wilds are always legal.
pub fn is_playable(card: &Card, top: &Card, active_color: CardColor) -> bool {
    if card.is_wild() {
        return true;
    }
    if top.is_wild() {
        return card.color() == Some(active_color);
    }
    card.similar_to(top)
}

/// Picks a card to play, or a draw when nothing in the hand qualifies.
///
/// On a resolved wild the candidates are cards of the active color plus
/// other wilds, and a non-wild card of the active color is preferred over
/// spending another wild. Among the surviving candidates the pick is
/// uniformly random.
pub fn decide(hand: &[Card], top: &Card, active_color: CardColor) -> TurnChoice {
    let mut candidates: Vec<&Card> = hand
        .iter()
        .filter(|card| is_playable(card, top, active_color))
        .collect();

    if candidates.is_empty() {
        debug!(%top, %active_color, "no playable card, drawing");
        return TurnChoice::Draw;
    }

    if top.is_wild() {
        let matching_color: Vec<&Card> = candidates
            .iter()
            .copied()
            .filter(|card| card.color() == Some(active_color))
            .collect();
        if !matching_color.is_empty() {
            candidates = matching_color;
        }
    }

    let card = candidates
        .choose(&mut thread_rng())
        .expect("candidates are non-empty here");
    debug!(card = %card, "machine picked a card");
    TurnChoice::Play((*card).clone())
}

/// The color announced after the machine plays a wild: the color it holds
/// most of, ties broken in enumeration order. A hand of nothing but wilds
/// gets a uniformly random color.
pub fn choose_color(hand: &[Card]) -> CardColor {
    let mut best: Option<(CardColor, usize)> = None;
    for color in CardColor::iter() {
        let count = hand
            .iter()
            .filter(|card| card.color() == Some(color))
            .count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((color, count));
        }
    }

    match best {
        Some((color, _)) => color,
        None => CardColor::iter()
            .collect::<Vec<_>>()
            .choose(&mut thread_rng())
            .copied()
            .expect("there is always at least one color"),
    }
}
