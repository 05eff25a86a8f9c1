use crate::console::{ConsoleOutputEvent, ProcessExitEvent};
use crate::event::channel::EventConsumer;

/// One registration on a process event stream.
pub(crate) enum Subscription {
    Output(EventConsumer<ConsoleOutputEvent>),
    Exit(EventConsumer<ProcessExitEvent>),
}

/// The event registrations held against the attached process.
///
/// Registrations are added one by one but only ever released together:
/// dropping a consumer disconnects its channel, so after
/// [`release_all`](SubscriptionSet::release_all) the process side observes
/// every stream as gone. Releasing an already-empty set is a no-op.
#[derive(Default)]
pub(crate) struct SubscriptionSet {
    active: Vec<Subscription>,
}

impl SubscriptionSet {
    pub(crate) fn add(&mut self, subscription: Subscription) {
        self.active.push(subscription);
    }

    /// The registered output consumer, while one is held.
    pub(crate) fn output(&self) -> Option<&EventConsumer<ConsoleOutputEvent>> {
        self.active.iter().find_map(|subscription| match subscription {
            Subscription::Output(consumer) => Some(consumer),
            _ => None,
        })
    }

    /// The registered exit consumer, while one is held.
    pub(crate) fn exit(&self) -> Option<&EventConsumer<ProcessExitEvent>> {
        self.active.iter().find_map(|subscription| match subscription {
            Subscription::Exit(consumer) => Some(consumer),
            _ => None,
        })
    }

    pub(crate) fn release_all(&mut self) {
        self.active.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
