use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{RecvError, never};
use crossbeam::select;
use tracing::{debug, error, info, info_span, warn};

use crate::connection::{ConnectionOptions, DriverInstallRequest};
use crate::console::{ConsoleOutputEvent, ConsoleProcess, ProcessExitEvent};
use crate::display::{ConsoleBuffer, DisplayService};
use crate::event::channel::{EventConsumer, EventPublisher, pub_sub};
use crate::server::ServerOperations;

use super::state::{HostState, StatusCell};
use super::subscriptions::{Subscription, SubscriptionSet};

/// Title of the dialog shown when the install request or the process start
/// fails.
pub const INSTALLATION_FAILED_TITLE: &str = "Installation failed";

const RUNTIME_THREAD_NAME: &str = "driver install host";

/// Continuation handed over by the wizard on deactivation. Runs exactly
/// once: after the cleanup in the ordinary case, or on drop if the command
/// never reached the runtime.
struct Completion(Option<Box<dyn FnOnce() + Send>>);

impl Completion {
    fn new(operation: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(operation)))
    }

    fn complete(mut self) {
        if let Some(operation) = self.0.take() {
            operation();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(operation) = self.0.take() {
            operation();
        }
    }
}

enum HostCommand {
    Deactivate(Completion),
}

/// Drives the installation of one ODBC driver.
///
/// [`initialize_info`](InstallerHost::initialize_info) asks the server to
/// install the requested driver and attaches to the console process carrying
/// the installation out: its output is relayed into the host's
/// [`ConsoleBuffer`] until the process exits and is reaped. Request and
/// start failures are shown to the user through the [`DisplayService`] and
/// never escalate to the caller.
///
/// The wizard deactivates the hosting panel through
/// [`on_deactivate`](InstallerHost::on_deactivate); afterwards the host is
/// back in [`HostState::Idle`] and can drive a fresh install.
pub struct InstallerHost<S, D> {
    server: Arc<S>,
    display: Arc<D>,
    console: ConsoleBuffer,
    status: StatusCell,
    commands: Option<EventPublisher<HostCommand>>,
    runtime: Option<JoinHandle<()>>,
}

impl<S, D> InstallerHost<S, D>
where
    S: ServerOperations + Send + Sync + 'static,
    S::Process: Send + 'static,
    D: DisplayService + Send + Sync + 'static,
{
    pub fn new(server: Arc<S>, display: Arc<D>) -> Self {
        Self {
            server,
            display,
            console: ConsoleBuffer::default(),
            status: StatusCell::default(),
            commands: None,
            runtime: None,
        }
    }

    /// Handle on the text shown by the install console widget.
    pub fn console(&self) -> ConsoleBuffer {
        self.console.clone()
    }

    pub fn state(&self) -> HostState {
        self.status.state()
    }

    /// Number of event registrations currently held against the process.
    pub fn active_subscriptions(&self) -> usize {
        self.status.subscriptions()
    }

    /// Appends `output` to the console, next to whatever the process emits.
    pub fn write_output(&self, output: &str) {
        self.console.append(output);
    }

    /// Records the install request and immediately begins the installation
    /// on the host runtime thread. Ignored while an installation is already
    /// running; the panel has to be deactivated before the host accepts a
    /// new request.
    pub fn initialize_info(&mut self, request: DriverInstallRequest) {
        if self.runtime_is_active() {
            warn!(driver = %request.driver(), "an install is already running, ignoring the request");
            return;
        }
        if let Some(finished) = self.runtime.take() {
            let _ = finished.join();
        }

        info!(driver = %request.driver(), "starting driver installation");
        self.status.transition(HostState::Requesting);

        let (command_publisher, command_consumer) = pub_sub();
        let runtime = HostRuntime {
            server: self.server.clone(),
            display: self.display.clone(),
            console: self.console.clone(),
            status: self.status.clone(),
            commands: command_consumer,
            request,
            process: None,
            subscriptions: SubscriptionSet::default(),
        };

        self.commands = Some(command_publisher);
        self.runtime = Some(
            thread::Builder::new()
                .name(RUNTIME_THREAD_NAME.to_string())
                .spawn(move || runtime.run())
                .expect("thread config should be valid"),
        );
    }

    /// Clears the console and winds the current installation down: the
    /// attached process, if any, is reaped. `operation` runs exactly once,
    /// after the cleanup, whatever the reap outcome. With no installation
    /// in flight it runs right away, on the caller.
    pub fn on_deactivate(&mut self, operation: impl FnOnce() + Send + 'static) {
        self.console.clear();

        let Some(commands) = self.commands.take() else {
            operation();
            return;
        };

        // The completion fires on drop, so the callback still runs when the
        // runtime is no longer there to handle the command.
        let _ = commands
            .publish(HostCommand::Deactivate(Completion::new(operation)))
            .inspect_err(|err| debug!(error = %err, "install runtime already gone"));
    }

    /// Connection options contributed by this panel. Installing a driver
    /// configures nothing, so this is always the default set.
    pub fn collect_input(&self) -> ConnectionOptions {
        ConnectionOptions::default()
    }

    fn runtime_is_active(&self) -> bool {
        self.commands.is_some()
            && self
                .runtime
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }
}

/// One select iteration's outcome, pulled out of the loop so the handlers
/// can borrow the runtime mutably.
enum Step {
    Command(Result<HostCommand, RecvError>),
    Output(Result<ConsoleOutputEvent, RecvError>),
    Exit(Result<ProcessExitEvent, RecvError>),
}

struct HostRuntime<S, D>
where
    S: ServerOperations,
{
    server: Arc<S>,
    display: Arc<D>,
    console: ConsoleBuffer,
    status: StatusCell,
    commands: EventConsumer<HostCommand>,
    request: DriverInstallRequest,
    process: Option<S::Process>,
    subscriptions: SubscriptionSet,
}

impl<S, D> HostRuntime<S, D>
where
    S: ServerOperations + Send + Sync + 'static,
    S::Process: Send + 'static,
    D: DisplayService + Send + Sync + 'static,
{
    fn run(mut self) {
        let span = info_span!("install_driver", driver = %self.request.driver());
        let _span_guard = span.enter();

        debug!("install runtime started");
        self.install_driver();
        self.relay_events();
        debug!("install runtime finished");
    }

    fn install_driver(&mut self) {
        match self.server.install_odbc_driver(self.request.driver()) {
            Ok(process) => self.attach_to_process(process),
            Err(err) => {
                error!(error = %err, "driver install request failed");
                self.display
                    .show_error_message(INSTALLATION_FAILED_TITLE, &err.to_string());
                self.status.transition(HostState::Failed);
            }
        }
    }

    fn attach_to_process(&mut self, mut process: S::Process) {
        self.subscriptions
            .add(Subscription::Output(process.subscribe_output()));
        self.subscriptions
            .add(Subscription::Exit(process.subscribe_exit()));
        self.status.set_subscriptions(self.subscriptions.len());
        self.status.transition(HostState::Attached);

        let started = process.start();
        // The handle is kept even when starting failed: deactivation still
        // reaps it.
        self.process = Some(process);

        match started {
            Ok(()) => debug!("install process started"),
            Err(err) => {
                error!(error = %err, "install process could not be started");
                self.display
                    .show_error_message(INSTALLATION_FAILED_TITLE, &err.to_string());
                self.release_subscriptions();
                self.status.transition(HostState::Failed);
            }
        }
    }

    /// Serves process events and host commands until the panel deactivates
    /// or the host handle goes away.
    fn relay_events(&mut self) {
        let never_output = EventConsumer::<ConsoleOutputEvent>::from(never());
        let never_exit = EventConsumer::<ProcessExitEvent>::from(never());
        let mut output_closed = false;
        let mut exit_closed = false;

        loop {
            let step = {
                let output = if output_closed {
                    &never_output
                } else {
                    self.subscriptions.output().unwrap_or(&never_output)
                };
                let exit = if exit_closed {
                    &never_exit
                } else {
                    self.subscriptions.exit().unwrap_or(&never_exit)
                };

                select! {
                    recv(self.commands.as_ref()) -> command => Step::Command(command),
                    recv(output.as_ref()) -> event => Step::Output(event),
                    recv(exit.as_ref()) -> event => Step::Exit(event),
                }
            };

            match step {
                Step::Command(Ok(HostCommand::Deactivate(done))) => {
                    self.deactivate(done);
                    break;
                }
                Step::Command(Err(_)) => {
                    debug!(select_arm = "commands", "host handle dropped, detaching");
                    self.detach();
                    break;
                }
                Step::Output(Ok(event)) => self.on_console_output(&event),
                Step::Output(Err(_)) => {
                    debug!(select_arm = "output", "output stream closed");
                    output_closed = true;
                }
                Step::Exit(Ok(event)) => self.on_process_exit(event),
                Step::Exit(Err(_)) => {
                    debug!(select_arm = "exit", "exit stream closed without an exit event");
                    exit_closed = true;
                }
            }
        }
    }

    fn on_console_output(&self, event: &ConsoleOutputEvent) {
        self.console.append(event.output());
    }

    /// Exit ends the process lifecycle: pending output is flushed to the
    /// console, the registrations are released and the handle is reaped.
    /// The reap outcome is deliberately dropped; the process is done either
    /// way.
    fn on_process_exit(&mut self, event: ProcessExitEvent) {
        info!(exit_code = ?event.exit_code(), "install process exited");

        self.drain_pending_output();
        self.release_subscriptions();

        if let Some(process) = self.process.take() {
            let _ = process
                .reap()
                .inspect_err(|err| debug!(error = %err, "reaping the exited install process failed"));
        }

        self.status.transition(HostState::Exited);
    }

    /// Output queued behind the exit event still belongs on the console.
    fn drain_pending_output(&self) {
        let Some(output) = self.subscriptions.output() else {
            return;
        };
        while let Ok(event) = output.as_ref().try_recv() {
            self.console.append(event.output());
        }
    }

    fn deactivate(&mut self, done: Completion) {
        debug!("deactivating the install panel");

        self.release_subscriptions();
        self.console.clear();

        if let Some(process) = self.process.take() {
            if let Err(err) = process.reap() {
                warn!(error = %err, "reaping the install process on deactivation failed");
            }
        }

        // Cleanup came this far on every path, so the continuation runs
        // whatever the reap said.
        done.complete();
        self.status.transition(HostState::Idle);
    }

    fn detach(&mut self) {
        self.release_subscriptions();

        if let Some(process) = self.process.take() {
            let _ = process
                .reap()
                .inspect_err(|err| debug!(error = %err, "reaping the install process on detach failed"));
        }

        self.status.transition(HostState::Idle);
    }

    fn release_subscriptions(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        self.subscriptions.release_all();
        self.status.set_subscriptions(0);
    }
}
