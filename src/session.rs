//! The asynchronous shell around [`Game`]: one shared lock, and the three
//! kinds of deferred work the rules call for — the machine's delayed turn,
//! the UNO grace-period countdown, and the paced game-over announcement.
//!
//! The engine is the single writer. Deferred tasks are just deferred
//! writer actions: each one re-acquires the lock and re-validates the
//! state it was scheduled against before touching anything, so a task that
//! fires after the game moved on is a no-op.

use std::sync::Arc;
use std::time::Duration;

use rand::{thread_rng, Rng};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::card::{Card, CardColor};
use crate::constants::{GAME_OVER_PAUSE, MACHINE_TURN_DELAY_MS, UNO_GRACE_PERIOD};
use crate::error::{GameError, Result};
use crate::game::Game;
use crate::observer::{ChannelObserver, GameEvent};
use crate::player::Seat;

fn seat_index(seat: Seat) -> usize {
    match seat {
        Seat::Human => 0,
        Seat::Machine => 1,
    }
}

/// A running game plus its timers. Commands mirror the engine's command
/// surface; every successful command re-evaluates what needs scheduling.
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    game: Mutex<Game>,
}

impl Session {
    /// Starts a game and returns the event stream the boundary layer
    /// should drain on its own loop.
    pub fn new(player_name: impl Into<String>) -> Result<(Self, UnboundedReceiver<GameEvent>)> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut game = Game::new(player_name)?;
        game.add_observer(Box::new(ChannelObserver::new(sender)));
        let session = Self {
            inner: Arc::new(Inner {
                game: Mutex::new(game),
            }),
        };
        Ok((session, receiver))
    }

    pub async fn play_card(&self, seat: Seat, card: Card) -> Result<()> {
        let mut game = self.inner.game.lock().await;
        game.play_card(seat, card)?;
        Inner::schedule_followups(&self.inner, &mut game);
        Ok(())
    }

    pub async fn draw_card(&self, seat: Seat) -> Result<()> {
        let mut game = self.inner.game.lock().await;
        game.draw_card(seat)?;
        Inner::schedule_followups(&self.inner, &mut game);
        Ok(())
    }

    /// A player's own UNO call. Supersedes any countdown running against
    /// them.
    pub async fn call_uno(&self, seat: Seat) {
        let mut game = self.inner.game.lock().await;
        game.call_uno(seat);
        Inner::schedule_followups(&self.inner, &mut game);
    }

    /// The opponent-catch variant: `caller` claims the other player missed
    /// their call, and the penalty check runs against that player right
    /// away. Returns whether the penalty stuck.
    pub async fn catch_missed_uno(&self, caller: Seat) -> Result<bool> {
        self.check_uno_penalty(caller.other()).await
    }

    pub async fn check_uno_penalty(&self, seat: Seat) -> Result<bool> {
        let mut game = self.inner.game.lock().await;
        let penalized = game.check_uno_penalty(seat)?;
        Inner::schedule_followups(&self.inner, &mut game);
        Ok(penalized)
    }

    pub async fn record_selection(&self, card: Card) {
        self.inner.game.lock().await.record_selection(card);
    }

    pub async fn record_color_choice(&self, color: CardColor) {
        self.inner.game.lock().await.record_color_choice(color);
    }

    /// Finishes a pending human wild play: records the picked color and
    /// plays the previously selected card. The selection survives a
    /// rejected play so the player can retry.
    pub async fn resolve_color_choice(&self, color: CardColor) -> Result<()> {
        let mut game = self.inner.game.lock().await;
        let card = game.selected_card().ok_or(GameError::NoCardSelected)?;
        game.record_color_choice(color);
        game.play_card(Seat::Human, card)?;
        game.take_selection();
        Inner::schedule_followups(&self.inner, &mut game);
        Ok(())
    }

    pub async fn top_discard_card(&self) -> Result<Card> {
        self.inner.game.lock().await.top_discard_card().cloned()
    }

    pub async fn current_seat(&self) -> Seat {
        self.inner.game.lock().await.current_seat()
    }

    pub async fn current_color(&self) -> CardColor {
        self.inner.game.lock().await.current_color()
    }

    pub async fn hand(&self, seat: Seat) -> Vec<Card> {
        self.inner.game.lock().await.hand(seat).to_vec()
    }

    pub async fn hand_size(&self, seat: Seat) -> usize {
        self.inner.game.lock().await.hand_size(seat)
    }

    pub async fn is_over(&self) -> bool {
        self.inner.game.lock().await.is_over()
    }

    pub async fn winner(&self) -> Option<Seat> {
        self.inner.game.lock().await.winner()
    }

    /// Direct access to the locked game, for boundary rendering that needs
    /// more than the accessors above.
    pub fn game(&self) -> &Mutex<Game> {
        &self.inner.game
    }
}

impl Inner {
    /// Looks at where an action left the game and arms whatever deferred
    /// work is now due. Runs under the same lock as the action itself, so
    /// no other action can slip in between.
    fn schedule_followups(inner: &Arc<Self>, game: &mut Game) {
        if game.is_over() {
            if !game.game_over_pending {
                game.game_over_pending = true;
                let inner = Arc::clone(inner);
                tokio::spawn(async move {
                    tokio::time::sleep(GAME_OVER_PAUSE).await;
                    inner.game.lock().await.announce_game_over();
                });
            }
            return;
        }

        if game.current_seat() == Seat::Machine && !game.machine_turn_scheduled {
            game.machine_turn_scheduled = true;
            let delay = Duration::from_millis(thread_rng().gen_range(MACHINE_TURN_DELAY_MS));
            debug!(?delay, "scheduling machine turn");
            let inner = Arc::clone(inner);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let mut game = inner.game.lock().await;
                game.machine_turn_scheduled = false;
                if game.is_over() || game.current_seat() != Seat::Machine {
                    // The game moved on while the machine was thinking.
                    return;
                }
                if let Err(error) = game.play_machine_turn() {
                    warn!(%error, "machine turn failed");
                }
                Inner::schedule_followups(&inner, &mut game);
            });
        }

        for seat in [Seat::Human, Seat::Machine] {
            // Bumping the epoch supersedes any countdown already running
            // against this seat; a new one is armed only while the player
            // sits at one card without a standing call.
            game.uno_timer_epochs[seat_index(seat)] += 1;
            let epoch = game.uno_timer_epochs[seat_index(seat)];
            let player = game.player(seat);
            if player.has_single_card() && !player.called_uno() {
                debug!(%seat, "arming UNO countdown");
                let inner = Arc::clone(inner);
                tokio::spawn(async move {
                    tokio::time::sleep(UNO_GRACE_PERIOD).await;
                    let mut game = inner.game.lock().await;
                    let stale = game.uno_timer_epochs[seat_index(seat)] != epoch;
                    if stale || game.is_over() {
                        return;
                    }
                    if let Err(error) = game.check_uno_penalty(seat) {
                        warn!(%error, "uno penalty check failed");
                    }
                });
            }
        }
    }
}
