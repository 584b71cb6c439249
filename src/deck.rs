use rand::{seq::SliceRandom, thread_rng};
use strum::IntoEnumIterator;

use crate::{
    card::{Card, CardColor, ColoredCard},
    constants::*,
    error::{GameError, Result},
};

/// The two piles every card outside a hand lives in. The tail of each
/// vector is the top: the next card to deal, and the card currently
/// showing on the discard pile.
#[derive(Debug)]
pub struct Deck {
    pub(crate) draw_pile: Vec<Card>,
    pub(crate) discard_pile: Vec<Card>,
}

impl Deck {
    /// Builds the full 108-card set in enumeration order. Callers shuffle
    /// before dealing.
    pub fn new() -> Self {
        let mut draw_pile = Vec::with_capacity(TOTAL_CARDS_IN_DECK.into());

        for color in CardColor::iter() {
            for number in NUMBER_CARDS_PER_COLOR {
                draw_pile.push(Card::Colored(color, ColoredCard::Number(*number)));
            }

            for _ in 0..SKIP_CARDS_PER_COLOR {
                draw_pile.push(Card::Colored(color, ColoredCard::Skip));
            }

            for _ in 0..REVERSE_CARDS_PER_COLOR {
                draw_pile.push(Card::Colored(color, ColoredCard::Reverse));
            }

            for _ in 0..DRAW_TWO_CARDS_PER_COLOR {
                draw_pile.push(Card::Colored(color, ColoredCard::DrawTwo));
            }
        }

        for _ in 0..WILD_CARDS_IN_DECK {
            draw_pile.push(Card::Wild);
        }

        for _ in 0..WILD_DRAW_FOUR_CARDS_IN_DECK {
            draw_pile.push(Card::WildDrawFour);
        }

        Self {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    pub(crate) fn shuffle(&mut self) {
        let mut rng = thread_rng();
        self.draw_pile.shuffle(&mut rng);
    }

    /// Pops the top of the draw pile. An empty draw pile first recycles
    /// the discard pile (minus its top card) back in, which fails with
    /// [`GameError::EmptyDeck`] when there is nothing to recycle.
    pub fn draw(&mut self) -> Result<Card> {
        if self.draw_pile.is_empty() {
            self.reshuffle()?;
        }
        self.draw_pile.pop().ok_or(GameError::EmptyDeck)
    }

    /// Draws `count` cards one at a time, in draw order. Each draw may
    /// itself trigger a reshuffle.
    pub fn draw_many(&mut self, count: usize) -> Result<Vec<Card>> {
        let mut cards = Vec::with_capacity(count);
        for _ in 0..count {
            cards.push(self.draw()?);
        }
        Ok(cards)
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// The card currently showing. Only fails before the opening discard.
    pub fn top_discard(&self) -> Result<&Card> {
        self.discard_pile.last().ok_or(GameError::EmptyPile)
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    fn reshuffle(&mut self) -> Result<()> {
        let top = match self.discard_pile.len() {
            0 | 1 => return Err(GameError::EmptyDeck),
            _ => self
                .discard_pile
                .pop()
                .expect("the discard pile has at least two cards here"),
        };
        self.draw_pile.append(&mut self.discard_pile);
        self.shuffle();
        self.discard_pile.push(top);
        Ok(())
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_card_count_new_deck() {
        assert_eq!(Deck::new().draw_pile_len(), TOTAL_CARDS_IN_DECK as usize);
    }

    #[test]
    fn shuffle_preserves_card_count() {
        let mut deck = Deck::new();
        deck.shuffle();
        assert_eq!(deck.draw_pile_len(), TOTAL_CARDS_IN_DECK as usize);
    }

    #[test]
    fn draw_pops_the_top_card() {
        let mut deck = Deck::new();
        let expected = deck.draw_pile.last().cloned().unwrap();
        assert_eq!(deck.draw().unwrap(), expected);
        assert_eq!(deck.draw_pile_len(), TOTAL_CARDS_IN_DECK as usize - 1);
    }

    #[test]
    fn draw_many_observes_draw_order() {
        let mut deck = Deck::new();
        let mut expected = deck.draw_pile[deck.draw_pile.len() - 3..].to_vec();
        expected.reverse();
        assert_eq!(deck.draw_many(3).unwrap(), expected);
    }

    #[test]
    fn top_discard_fails_before_first_discard() {
        let deck = Deck::new();
        assert_eq!(deck.top_discard().unwrap_err(), GameError::EmptyPile);
    }

    #[test]
    fn discarded_card_becomes_new_top() {
        let mut deck = Deck::new();
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        let blue_7 = Card::Colored(CardColor::Blue, ColoredCard::Number(7));
        deck.discard(red_3.clone());
        deck.discard(blue_7.clone());
        assert_eq!(deck.top_discard().unwrap(), &blue_7);
    }

    #[test]
    fn empty_draw_pile_recycles_discards_and_keeps_the_top() {
        let mut deck = Deck::new();
        let discards = deck.draw_many(5).unwrap();
        let top = discards.last().cloned().unwrap();
        deck.draw_pile.clear();
        for card in discards {
            deck.discard(card);
        }

        let drawn = deck.draw().unwrap();

        // 5 discarded, 1 kept on the discard pile, 1 just drawn.
        assert_eq!(deck.draw_pile_len(), 3);
        assert_eq!(deck.discard_pile_len(), 1);
        assert_eq!(deck.top_discard().unwrap(), &top);
        assert_ne!(&drawn, deck.top_discard().unwrap());
    }

    #[test]
    fn draw_fails_without_enough_discards_to_recycle() {
        let mut deck = Deck::new();
        let card = deck.draw().unwrap();
        deck.draw_pile.clear();
        deck.discard(card.clone());

        assert_eq!(deck.draw().unwrap_err(), GameError::EmptyDeck);

        // Nothing moved.
        assert_eq!(deck.draw_pile_len(), 0);
        assert_eq!(deck.discard_pile_len(), 1);
        assert_eq!(deck.top_discard().unwrap(), &card);
    }

    #[test]
    fn every_card_stays_accounted_for_across_a_reshuffle() {
        let mut deck = Deck::new();
        deck.shuffle();
        for _ in 0..20 {
            let card = deck.draw().unwrap();
            deck.discard(card);
        }
        deck.draw_pile.clear();

        deck.draw().unwrap();

        assert_eq!(deck.draw_pile_len() + deck.discard_pile_len(), 20 - 1);
    }
}
