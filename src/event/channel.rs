use crossbeam::channel::{Receiver, Sender, unbounded};
use thiserror::Error;

/// Consuming half of an event channel. Dropping it disconnects the channel,
/// which is how subscriptions are released.
pub struct EventConsumer<E>(Receiver<E>);

impl<E> From<Receiver<E>> for EventConsumer<E> {
    fn from(value: Receiver<E>) -> Self {
        Self(value)
    }
}

/// Publishing half of an event channel.
pub struct EventPublisher<E>(Sender<E>);

impl<E> From<Sender<E>> for EventPublisher<E> {
    fn from(value: Sender<E>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EventPublisherError {
    #[error("the event could not be delivered: {0}")]
    SendError(String),
}

/// Creates a connected publisher/consumer pair over an unbounded channel.
pub fn pub_sub<E>() -> (EventPublisher<E>, EventConsumer<E>) {
    let (sender, receiver) = unbounded();
    (EventPublisher(sender), EventConsumer(receiver))
}

impl<E> EventPublisher<E> {
    /// Hands `event` to the consumer. Fails only when the consuming half is
    /// gone.
    pub fn publish(&self, event: E) -> Result<(), EventPublisherError> {
        self.0
            .send(event)
            .map_err(|err| EventPublisherError::SendError(err.to_string()))
    }
}

impl<E> Clone for EventPublisher<E> {
    fn clone(&self) -> Self {
        EventPublisher(self.0.clone())
    }
}

impl<E> AsRef<Receiver<E>> for EventConsumer<E> {
    fn as_ref(&self) -> &Receiver<E> {
        &self.0
    }
}
