/// One chunk of output emitted by the install process. Chunks carry their
/// own line breaks; consumers concatenate them as they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutputEvent {
    output: String,
}

impl ConsoleOutputEvent {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Termination notice of the install process. The exit code is absent when
/// the process was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExitEvent {
    exit_code: Option<i32>,
}

impl ProcessExitEvent {
    pub fn new(exit_code: Option<i32>) -> Self {
        Self { exit_code }
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}
