use std::fmt::Display;
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Lifecycle of the installation a host is driving.
///
/// `Exited` and `Failed` are terminal for that installation; the host goes
/// back to `Idle` when the panel is deactivated and can then drive a fresh
/// install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostState {
    /// No install requested, or the previous one was cleaned up.
    #[default]
    Idle,
    /// Install request sent, no process handle yet.
    Requesting,
    /// Process handle received and subscriptions registered.
    Attached,
    /// The process exited and was reaped.
    Exited,
    /// The request was refused or the process never started.
    Failed,
}

impl HostState {
    fn may_transition_to(self, next: HostState) -> bool {
        use HostState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, Attached | Failed)
                | (Attached, Exited | Failed | Idle)
                | (Exited | Failed, Idle)
        )
    }
}

impl Display for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HostState::Idle => "idle",
            HostState::Requesting => "requesting",
            HostState::Attached => "attached",
            HostState::Exited => "exited",
            HostState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Default)]
struct Status {
    state: HostState,
    subscriptions: usize,
}

/// Observable host status, shared between the host handle and its runtime
/// thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct StatusCell {
    inner: Arc<Mutex<Status>>,
}

impl StatusCell {
    pub(crate) fn state(&self) -> HostState {
        self.inner.lock().expect("failed to acquire the lock").state
    }

    pub(crate) fn subscriptions(&self) -> usize {
        self.inner
            .lock()
            .expect("failed to acquire the lock")
            .subscriptions
    }

    pub(crate) fn set_subscriptions(&self, active: usize) {
        self.inner
            .lock()
            .expect("failed to acquire the lock")
            .subscriptions = active;
    }

    /// Moves the lifecycle to `next`. A transition outside the lifecycle
    /// table is carried out anyway but flagged in the logs.
    pub(crate) fn transition(&self, next: HostState) {
        let mut status = self.inner.lock().expect("failed to acquire the lock");
        if !status.state.may_transition_to(next) {
            warn!(from = %status.state, to = %next, "unexpected install state transition");
        }
        status.state = next;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::HostState::*;
    use super::*;

    #[rstest]
    #[case(Idle, Requesting)]
    #[case(Requesting, Attached)]
    #[case(Requesting, Failed)]
    #[case(Attached, Exited)]
    #[case(Attached, Failed)]
    #[case(Attached, Idle)]
    #[case(Exited, Idle)]
    #[case(Failed, Idle)]
    fn lifecycle_transitions(#[case] from: HostState, #[case] to: HostState) {
        assert!(from.may_transition_to(to));
    }

    #[rstest]
    #[case(Idle, Attached)]
    #[case(Idle, Exited)]
    #[case(Idle, Idle)]
    #[case(Requesting, Exited)]
    #[case(Requesting, Idle)]
    #[case(Exited, Requesting)]
    #[case(Failed, Attached)]
    fn rejected_transitions(#[case] from: HostState, #[case] to: HostState) {
        assert!(!from.may_transition_to(to));
    }

    #[test]
    fn cell_tracks_state_and_subscriptions() {
        let cell = StatusCell::default();
        assert_eq!(cell.state(), Idle);

        cell.transition(Requesting);
        cell.set_subscriptions(2);

        let observer = cell.clone();
        assert_eq!(observer.state(), Requesting);
        assert_eq!(observer.subscriptions(), 2);
    }
}
