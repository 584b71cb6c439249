use tokio::sync::mpsc::UnboundedSender;

use crate::card::{Card, CardColor};
use crate::player::Seat;

/// Everything the engine tells the outside world. Events for a single
/// action are delivered in order, and all observers see an event before
/// the engine moves on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted(Seat),
    CardPlayed(Seat, Card),
    /// `None` when the draw is attributed to an effect or penalty rather
    /// than a specific card (draw-two, wild-draw-four, missed UNO).
    CardDrawn(Seat, Option<Card>),
    UnoCalled(Seat),
    ColorSelected(Seat, CardColor),
    GameOver(Seat),
}

/// Notification contract toward the boundary layer. Observers are invoked
/// synchronously on the engine's thread of control; anything that needs
/// its own execution context should forward the event and return, the way
/// [`ChannelObserver`] does.
pub trait GameObserver: Send {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Forwards every event into an unbounded channel without blocking, so a
/// presentation layer can drain them on its own loop. A closed receiver
/// just drops events.
pub struct ChannelObserver {
    sender: UnboundedSender<GameEvent>,
}

impl ChannelObserver {
    pub fn new(sender: UnboundedSender<GameEvent>) -> Self {
        Self { sender }
    }
}

impl GameObserver for ChannelObserver {
    fn on_event(&mut self, event: &GameEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn channel_observer_forwards_events_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut observer = ChannelObserver::new(tx);

        observer.on_event(&GameEvent::TurnStarted(Seat::Human));
        observer.on_event(&GameEvent::UnoCalled(Seat::Human));

        assert_eq!(rx.try_recv().unwrap(), GameEvent::TurnStarted(Seat::Human));
        assert_eq!(rx.try_recv().unwrap(), GameEvent::UnoCalled(Seat::Human));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_observer_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut observer = ChannelObserver::new(tx);
        drop(rx);

        observer.on_event(&GameEvent::TurnStarted(Seat::Machine));
    }
}
