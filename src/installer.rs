//! The installer host: glue between the wizard panel, the server-side
//! installer and the console widget.

mod host;
mod state;
mod subscriptions;

pub use host::{INSTALLATION_FAILED_TITLE, InstallerHost};
pub use state::HostState;
