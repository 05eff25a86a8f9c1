//! Installer host for the new-connection wizard.
//!
//! This library backs the "install ODBC driver" step of the connections
//! wizard. The [`installer::InstallerHost`] asks the server to install a
//! driver, attaches to the console process carrying out the installation,
//! relays its output into a read-only console buffer and reaps the process
//! once it exits or the hosting panel is deactivated.
//!
//! Process execution, dialog rendering and the RPC transport live behind the
//! [`console::ConsoleProcess`], [`display::DisplayService`] and
//! [`server::ServerOperations`] traits; the embedding application provides
//! the implementations.

pub mod connection;
pub mod console;
pub mod display;
pub mod event;
pub mod installer;
pub mod logging;
pub mod server;
