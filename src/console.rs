//! Console-process collaborator interface.
//!
//! The server-side installer runs inside a console process. The host only
//! ever talks to it through [`ConsoleProcess`]: subscribe to its event
//! streams, start it, and reap the handle once the process is done with.

use thiserror::Error;

use crate::event::channel::EventConsumer;

pub mod event_bus;
mod events;

pub use event_bus::ConsoleEventBus;
pub use events::{ConsoleOutputEvent, ProcessExitEvent};

#[derive(Debug, Error)]
pub enum ConsoleProcessError {
    #[error("the process could not be started: {0}")]
    StartFailed(String),

    #[error("the process could not be reaped: {0}")]
    ReapFailed(String),
}

/// Handle on one console process executing an install.
///
/// Subscriptions registered before [`start`](ConsoleProcess::start) see every
/// event the process emits. A subscription is released by dropping its
/// consumer. [`reap`](ConsoleProcess::reap) consumes the handle: it frees the
/// server-side resources and nothing can be done with the process afterwards.
pub trait ConsoleProcess {
    /// Registers a consumer on the process output stream.
    fn subscribe_output(&mut self) -> EventConsumer<ConsoleOutputEvent>;

    /// Registers a consumer on the process exit stream. The stream carries a
    /// single event, emitted when the process terminates.
    fn subscribe_exit(&mut self) -> EventConsumer<ProcessExitEvent>;

    fn start(&mut self) -> Result<(), ConsoleProcessError>;

    fn reap(self) -> Result<(), ConsoleProcessError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use mockall::mock;

    use crate::console::{ConsoleOutputEvent, ConsoleProcessError, ProcessExitEvent};
    use crate::event::channel::EventConsumer;

    use super::ConsoleProcess;

    mock! {
        pub ConsoleProcess {}

        impl ConsoleProcess for ConsoleProcess {
            fn subscribe_output(&mut self) -> EventConsumer<ConsoleOutputEvent>;
            fn subscribe_exit(&mut self) -> EventConsumer<ProcessExitEvent>;
            fn start(&mut self) -> Result<(), ConsoleProcessError>;
            fn reap(self) -> Result<(), ConsoleProcessError>;
        }
    }
}
