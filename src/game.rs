use tracing::{debug, info};

use crate::card::{Card, CardColor, ColoredCard};
use crate::constants::OPENING_HAND_SIZE;
use crate::deck::Deck;
use crate::error::{GameError, Result};
use crate::machine;
use crate::observer::{GameEvent, GameObserver};
use crate::player::{Player, Seat};

const MACHINE_NAME: &str = "Computer";

/// The whole game state: one human, one automated opponent, the deck, the
/// active color constraint, and the registered observers. Every mutation
/// goes through one of the command methods, which validate before they
/// touch anything, so a rejected action leaves the game untouched.
pub struct Game {
    deck: Deck,
    human: Player,
    machine: Player,
    current: Seat,
    active_color: CardColor,
    winner: Option<Seat>,
    game_over_announced: bool,
    observers: Vec<Box<dyn GameObserver>>,

    // Scheduling bookkeeping for the session layer, kept under the same
    // lock as the rest of the state.
    pub(crate) machine_turn_scheduled: bool,
    pub(crate) game_over_pending: bool,
    pub(crate) uno_timer_epochs: [u64; 2],
}

impl Game {
    /// Deals the opening hands and the opening discard, then hands the
    /// first turn to the human.
    ///
    /// The opening discard must not be a special card: special cards drawn
    /// while searching are set aside and stay out of circulation for the
    /// rest of the game.
    pub fn new(player_name: impl Into<String>) -> Result<Self> {
        let mut deck = Deck::new();
        deck.shuffle();

        let mut human = Player::new_human(player_name);
        let mut machine = Player::new_machine(MACHINE_NAME);
        human.add_cards(deck.draw_many(OPENING_HAND_SIZE)?);
        machine.add_cards(deck.draw_many(OPENING_HAND_SIZE)?);

        let opening = loop {
            let card = deck.draw()?;
            if !card.is_special() {
                break card;
            }
        };
        let active_color = opening
            .color()
            .expect("a non-special card always has a color");
        deck.discard(opening);

        let mut game = Self {
            deck,
            human,
            machine,
            current: Seat::Human,
            active_color,
            winner: None,
            game_over_announced: false,
            observers: Vec::new(),
            machine_turn_scheduled: false,
            game_over_pending: false,
            uno_timer_epochs: [0, 0],
        };
        game.emit(GameEvent::TurnStarted(Seat::Human));
        Ok(game)
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Plays `card` from `seat`'s hand onto the discard pile, resolving
    /// wild colors and special-card effects, and advances the turn unless
    /// the play emptied the hand.
    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<()> {
        self.ensure_running()?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }

        let top = self.deck.top_discard()?.clone();
        if !card.is_wild() {
            if top.is_wild() {
                // A resolved wild is showing: only the announced color goes.
                if card.color() != Some(self.active_color) {
                    return Err(GameError::WrongColor(self.active_color));
                }
            } else if !card.similar_to(&top) {
                return Err(GameError::IllegalCard);
            }
        }
        if !self.player(seat).hand.contains(&card) {
            return Err(GameError::CardNotFound);
        }
        if card.is_wild() && seat == Seat::Human && self.human.selected_color().is_none() {
            return Err(GameError::MissingColorChoice);
        }

        // Validation is done; from here the action runs to completion.
        debug!(player = %self.player(seat).name(), card = %card, "playing card");
        self.player_mut(seat).remove_card(&card)?;
        self.deck.discard(card.clone());

        if card.is_wild() {
            let color = match seat {
                Seat::Human => self
                    .human
                    .take_color_choice()
                    .ok_or(GameError::MissingColorChoice)?,
                Seat::Machine => machine::choose_color(&self.machine.hand),
            };
            self.active_color = color;
            self.emit(GameEvent::ColorSelected(seat, color));
        } else if let Some(color) = card.color() {
            self.active_color = color;
        }

        self.apply_card_effect(&card)?;
        self.emit(GameEvent::CardPlayed(seat, card));

        if self.player(seat).hand.is_empty() {
            info!(winner = %self.player(seat).name(), "hand emptied, game over");
            self.winner = Some(seat);
            return Ok(());
        }

        self.switch_turn();
        Ok(())
    }

    /// Draws one card for `seat`. The machine plays the drawn card right
    /// away when it happens to be playable; the human's turn simply ends.
    pub fn draw_card(&mut self, seat: Seat) -> Result<()> {
        self.ensure_running()?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }

        let card = self.deck.draw()?;
        debug!(player = %self.player(seat).name(), card = %card, "drawing card");
        self.player_mut(seat).add_card(card.clone());
        self.emit(GameEvent::CardDrawn(seat, Some(card.clone())));

        if seat == Seat::Machine {
            let top = self.deck.top_discard()?.clone();
            if machine::is_playable(&card, &top, self.active_color) {
                return self.play_card(seat, card);
            }
        }

        self.switch_turn();
        Ok(())
    }

    /// Marks `seat`'s UNO call. Whether the call is timely is the
    /// timeout coordinator's business; the mark itself is unconditional.
    pub fn call_uno(&mut self, seat: Seat) {
        self.player_mut(seat).call_uno();
        self.emit(GameEvent::UnoCalled(seat));
    }

    /// The grace-period check: a player caught at one card without a
    /// standing call draws one penalty card. Returns whether the penalty
    /// was applied. The human's call state is cleared either way so the
    /// next single-card turn starts fresh.
    pub fn check_uno_penalty(&mut self, seat: Seat) -> Result<bool> {
        let penalized = self.player(seat).has_single_card() && !self.player(seat).called_uno();
        if penalized {
            let card = self.deck.draw()?;
            self.player_mut(seat).add_card(card);
            self.emit(GameEvent::CardDrawn(seat, None));
            info!(player = %self.player(seat).name(), "missed the UNO call, one penalty card");
        }
        if seat == Seat::Human {
            self.human.reset_uno();
        }
        Ok(penalized)
    }

    /// The machine's complete scheduled turn: call UNO when down to one
    /// card, then play the decided card or draw.
    pub fn play_machine_turn(&mut self) -> Result<()> {
        self.ensure_running()?;
        if self.current != Seat::Machine {
            return Err(GameError::NotYourTurn);
        }

        if self.machine.has_single_card() && !self.machine.called_uno() {
            self.call_uno(Seat::Machine);
        }

        let top = self.deck.top_discard()?.clone();
        match machine::decide(&self.machine.hand, &top, self.active_color) {
            machine::TurnChoice::Play(card) => self.play_card(Seat::Machine, card),
            machine::TurnChoice::Draw => self.draw_card(Seat::Machine),
        }
    }

    /// Emits `GameOver` for a finished game. Separate from the winning
    /// play so the session can pace the announcement; emits at most once.
    pub fn announce_game_over(&mut self) {
        if self.game_over_announced {
            return;
        }
        if let Some(winner) = self.winner {
            self.game_over_announced = true;
            self.emit(GameEvent::GameOver(winner));
        }
    }

    /// Boundary mailbox: the card the human clicked, held until the play
    /// is finalized.
    pub fn record_selection(&mut self, card: Card) {
        self.human.record_selection(card);
    }

    pub fn selected_card(&self) -> Option<Card> {
        self.human.selected_card()
    }

    pub fn take_selection(&mut self) -> Option<Card> {
        self.human.take_selection()
    }

    /// Boundary mailbox: the color picked for a pending wild play.
    pub fn record_color_choice(&mut self, color: CardColor) {
        self.human.record_color_choice(color);
    }

    pub fn top_discard_card(&self) -> Result<&Card> {
        self.deck.top_discard()
    }

    pub fn current_seat(&self) -> Seat {
        self.current
    }

    pub fn current_color(&self) -> CardColor {
        self.active_color
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.player(seat).hand
    }

    pub fn hand_size(&self, seat: Seat) -> usize {
        self.player(seat).hand_size()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn player(&self, seat: Seat) -> &Player {
        match seat {
            Seat::Human => &self.human,
            Seat::Machine => &self.machine,
        }
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        match seat {
            Seat::Human => &mut self.human,
            Seat::Machine => &mut self.machine,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    fn ensure_running(&self) -> Result<()> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    /// Skip and Reverse advance the turn here *and* again through the
    /// normal post-play advance, handing the turn straight back to the
    /// player in a two-player game. Draw effects punish the next player
    /// and also advance here before the post-play advance. This double
    /// advance is the designed two-player behavior; keep it.
    fn apply_card_effect(&mut self, card: &Card) -> Result<()> {
        match card {
            Card::Colored(_, ColoredCard::Skip) | Card::Colored(_, ColoredCard::Reverse) => {
                self.switch_turn();
            }
            Card::Colored(_, ColoredCard::DrawTwo) => self.penalize_next(2)?,
            Card::WildDrawFour => self.penalize_next(4)?,
            _ => {}
        }
        Ok(())
    }

    fn penalize_next(&mut self, count: usize) -> Result<()> {
        let victim = self.current.other();
        let cards = self.deck.draw_many(count)?;
        self.player_mut(victim).add_cards(cards);
        self.emit(GameEvent::CardDrawn(victim, None));
        self.switch_turn();
        Ok(())
    }

    fn switch_turn(&mut self) {
        self.current = self.current.other();
        // A new turn starts fresh: any earlier call has to be repeated.
        self.player_mut(self.current).reset_uno();
        self.emit(GameEvent::TurnStarted(self.current));
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("deck", &self.deck)
            .field("human", &self.human)
            .field("machine", &self.machine)
            .field("current", &self.current)
            .field("active_color", &self.active_color)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
