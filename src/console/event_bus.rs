use crate::event::broadcaster::UnboundedBroadcast;
use crate::event::channel::EventConsumer;

use super::{ConsoleOutputEvent, ProcessExitEvent};

/// Event streams of one console process.
///
/// Process implementations publish through the bus; the host subscribes on
/// each stream. Several subscribers per stream are fine, every one of them
/// sees every event published after it subscribed.
///
/// ```rust
/// use odbc_install_host::console::{ConsoleEventBus, ConsoleOutputEvent};
///
/// let mut bus = ConsoleEventBus::default();
/// let output = bus.subscribe_output();
///
/// bus.publish_output(ConsoleOutputEvent::new("Downloading..."));
///
/// assert_eq!(output.as_ref().recv().unwrap().output(), "Downloading...");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleEventBus {
    output: UnboundedBroadcast<ConsoleOutputEvent>,
    exit: UnboundedBroadcast<ProcessExitEvent>,
}

impl ConsoleEventBus {
    pub fn subscribe_output(&mut self) -> EventConsumer<ConsoleOutputEvent> {
        self.output.subscribe()
    }

    pub fn subscribe_exit(&mut self) -> EventConsumer<ProcessExitEvent> {
        self.exit.subscribe()
    }

    pub fn publish_output(&self, event: ConsoleOutputEvent) {
        self.output.broadcast(event);
    }

    pub fn publish_exit(&self, event: ProcessExitEvent) {
        self.exit.broadcast(event);
    }
}
