//! Server-operations collaborator interface.

use thiserror::Error;

use crate::connection::DriverName;
use crate::console::ConsoleProcess;

#[derive(Debug, Error)]
pub enum ServerRequestError {
    #[error("the server rejected the request: {0}")]
    Rejected(String),

    #[error("could not reach the server: {0}")]
    Unreachable(String),
}

/// Outbound interface towards the workbench server.
///
/// An accepted install request hands back the console process carrying out
/// the installation; the caller owns the handle from that point on. The
/// error message is user-presentable and ends up in the failure dialog.
pub trait ServerOperations {
    type Process: ConsoleProcess;

    fn install_odbc_driver(
        &self,
        driver: &DriverName,
    ) -> Result<Self::Process, ServerRequestError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use mockall::mock;

    use crate::connection::DriverName;
    use crate::console::tests::MockConsoleProcess;

    use super::{ServerOperations, ServerRequestError};

    mock! {
        pub ServerOperations {}

        impl ServerOperations for ServerOperations {
            type Process = MockConsoleProcess;

            fn install_odbc_driver(
                &self,
                driver: &DriverName,
            ) -> Result<MockConsoleProcess, ServerRequestError>;
        }
    }
}
