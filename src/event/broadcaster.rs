use std::sync::{Arc, Mutex};

use crossbeam::channel::{Sender, unbounded};

use super::channel::EventConsumer;

/// Unbounded one-to-many fan-out for low-rate event streams.
///
/// Every subscriber owns its own queue and sees every event published after
/// it subscribed. Subscribers release their registration by dropping the
/// consumer; disconnected subscribers are forgotten on the next broadcast.
///
/// ```rust
/// use odbc_install_host::event::broadcaster::UnboundedBroadcast;
///
/// let mut broadcast = UnboundedBroadcast::default();
/// let subscriber = broadcast.subscribe();
///
/// broadcast.broadcast("Downloading...");
///
/// assert_eq!(subscriber.as_ref().recv().unwrap(), "Downloading...");
/// ```
#[derive(Debug, Clone)]
pub struct UnboundedBroadcast<E> {
    subscribed_senders: Arc<Mutex<Vec<Sender<E>>>>,
}

// Written out because the derive would bound `E: Default` for an empty
// subscriber list.
impl<E> Default for UnboundedBroadcast<E> {
    fn default() -> Self {
        Self {
            subscribed_senders: Arc::default(),
        }
    }
}

impl<E> UnboundedBroadcast<E>
where
    E: Clone,
{
    /// Registers a new consumer on the stream.
    pub fn subscribe(&mut self) -> EventConsumer<E> {
        let (sender, receiver) = unbounded();

        self.subscribed_senders
            .lock()
            .expect("failed to acquire the lock")
            .push(sender);

        EventConsumer::from(receiver)
    }

    /// Sends `event` to every still-connected subscriber. Never blocks and
    /// never fails: the channels are unbounded and disconnected subscribers
    /// are dropped from the list.
    pub fn broadcast(&self, event: E) {
        self.subscribed_senders
            .lock()
            .expect("failed to acquire the lock")
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_the_event() {
        let mut broadcast = UnboundedBroadcast::default();

        let first = broadcast.subscribe();
        let second = broadcast.subscribe();

        broadcast.broadcast("event");

        assert_eq!(first.as_ref().recv().unwrap(), "event");
        assert_eq!(second.as_ref().recv().unwrap(), "event");
    }

    #[test]
    fn cloned_broadcasters_share_the_subscriber_list() {
        let mut broadcast = UnboundedBroadcast::default();
        let cloned = broadcast.clone();

        let subscriber = broadcast.subscribe();

        broadcast.broadcast("first");
        cloned.broadcast("second");

        assert_eq!(subscriber.as_ref().recv().unwrap(), "first");
        assert_eq!(subscriber.as_ref().recv().unwrap(), "second");
    }

    #[test]
    fn dropped_subscribers_do_not_break_the_broadcast() {
        let mut broadcast = UnboundedBroadcast::default();

        let kept = broadcast.subscribe();
        let released = broadcast.subscribe();
        drop(released);

        broadcast.broadcast("event");

        assert_eq!(kept.as_ref().recv().unwrap(), "event");
    }

    #[test]
    fn queued_events_survive_the_broadcaster() {
        let mut broadcast = UnboundedBroadcast::default();
        let subscriber = broadcast.subscribe();

        broadcast.broadcast("event");
        drop(broadcast);

        assert_eq!(subscriber.as_ref().recv().unwrap(), "event");
        subscriber.as_ref().recv().unwrap_err();
    }

    #[test]
    fn default_construction_needs_no_default_payload() {
        #[derive(Debug, Clone, PartialEq)]
        struct Chunk(&'static str);

        let mut broadcast = UnboundedBroadcast::<Chunk>::default();
        let subscriber = broadcast.subscribe();

        broadcast.broadcast(Chunk("event"));

        assert_eq!(subscriber.as_ref().recv().unwrap(), Chunk("event"));
    }
}
