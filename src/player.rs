use strum_macros::Display;

use crate::card::{Card, CardColor};
use crate::error::{GameError, Result};

/// The two fixed chairs at the table.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Seat {
    Human,
    Machine,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::Human => Seat::Machine,
            Seat::Machine => Seat::Human,
        }
    }
}

/// What distinguishes the two players. The human variant is passive: it
/// carries a mailbox the boundary layer fills in (the card the player
/// clicked, the color picked for a wild) before the engine resolves the
/// play. The machine has no pending state; it decides inside its own
/// scheduled turn.
#[derive(Debug)]
pub enum PlayerKind {
    Human {
        selected_card: Option<Card>,
        selected_color: Option<CardColor>,
    },
    Machine,
}

#[derive(Debug)]
pub struct Player {
    name: String,
    pub hand: Vec<Card>,
    called_uno: bool,
    kind: PlayerKind,
}

impl Player {
    pub fn new_human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            called_uno: false,
            kind: PlayerKind::Human {
                selected_card: None,
                selected_color: None,
            },
        }
    }

    pub fn new_machine(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            called_uno: false,
            kind: PlayerKind::Machine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_machine(&self) -> bool {
        matches!(self.kind, PlayerKind::Machine)
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn has_single_card(&self) -> bool {
        self.hand.len() == 1
    }

    // A standing UNO call only survives while the hand stays at one card,
    // so any hand change clears it.

    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
        self.called_uno = false;
    }

    pub fn add_cards(&mut self, cards: Vec<Card>) {
        for card in cards {
            self.add_card(card);
        }
    }

    pub fn remove_card(&mut self, card: &Card) -> Result<Card> {
        let index = self
            .hand
            .iter()
            .position(|held| held == card)
            .ok_or(GameError::CardNotFound)?;
        self.called_uno = false;
        Ok(self.hand.remove(index))
    }

    pub fn called_uno(&self) -> bool {
        self.called_uno
    }

    pub fn call_uno(&mut self) {
        self.called_uno = true;
    }

    pub fn reset_uno(&mut self) {
        self.called_uno = false;
    }

    /// Boundary mailbox write: the card the human clicked. Ignored for the
    /// machine.
    pub fn record_selection(&mut self, card: Card) {
        if let PlayerKind::Human { selected_card, .. } = &mut self.kind {
            *selected_card = Some(card);
        }
    }

    pub fn selected_card(&self) -> Option<Card> {
        match &self.kind {
            PlayerKind::Human { selected_card, .. } => selected_card.clone(),
            PlayerKind::Machine => None,
        }
    }

    pub fn take_selection(&mut self) -> Option<Card> {
        match &mut self.kind {
            PlayerKind::Human { selected_card, .. } => selected_card.take(),
            PlayerKind::Machine => None,
        }
    }

    /// Boundary mailbox write: the color picked for a pending wild play.
    /// Ignored for the machine.
    pub fn record_color_choice(&mut self, color: CardColor) {
        if let PlayerKind::Human { selected_color, .. } = &mut self.kind {
            *selected_color = Some(color);
        }
    }

    pub fn selected_color(&self) -> Option<CardColor> {
        match &self.kind {
            PlayerKind::Human { selected_color, .. } => *selected_color,
            PlayerKind::Machine => None,
        }
    }

    pub fn take_color_choice(&mut self) -> Option<CardColor> {
        match &mut self.kind {
            PlayerKind::Human { selected_color, .. } => selected_color.take(),
            PlayerKind::Machine => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ColoredCard;

    fn red(number: u8) -> Card {
        Card::Colored(CardColor::Red, ColoredCard::Number(number))
    }

    #[test]
    fn adding_a_card_clears_a_standing_uno_call() {
        let mut player = Player::new_human("p");
        player.add_card(red(1));
        player.call_uno();
        assert!(player.called_uno());

        player.add_card(red(2));
        assert!(!player.called_uno());
    }

    #[test]
    fn removing_a_card_clears_a_standing_uno_call() {
        let mut player = Player::new_human("p");
        player.add_cards(vec![red(1), red(2)]);
        player.call_uno();

        player.remove_card(&red(2)).unwrap();
        assert!(!player.called_uno());
        assert!(player.has_single_card());
    }

    #[test]
    fn removing_an_absent_card_fails_and_leaves_the_hand_alone() {
        let mut player = Player::new_human("p");
        player.add_card(red(1));

        assert_eq!(player.remove_card(&red(9)).unwrap_err(), GameError::CardNotFound);
        assert_eq!(player.hand_size(), 1);
    }

    #[test]
    fn removing_a_duplicate_removes_only_one_copy() {
        let mut player = Player::new_human("p");
        player.add_cards(vec![red(5), red(5)]);

        player.remove_card(&red(5)).unwrap();
        assert_eq!(player.hand_size(), 1);
    }

    #[test]
    fn human_mailbox_holds_and_surrenders_choices() {
        let mut player = Player::new_human("p");
        player.record_selection(Card::Wild);
        player.record_color_choice(CardColor::Green);

        assert_eq!(player.selected_color(), Some(CardColor::Green));
        assert_eq!(player.take_selection(), Some(Card::Wild));
        assert_eq!(player.take_color_choice(), Some(CardColor::Green));

        // Consumed.
        assert_eq!(player.take_selection(), None);
        assert_eq!(player.take_color_choice(), None);
    }

    #[test]
    fn machine_mailbox_is_inert() {
        let mut player = Player::new_machine("m");
        player.record_selection(Card::Wild);
        player.record_color_choice(CardColor::Green);

        assert_eq!(player.take_selection(), None);
        assert_eq!(player.selected_color(), None);
    }
}
