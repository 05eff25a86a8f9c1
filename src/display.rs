//! Display collaborators: the modal dialog service and the text model behind
//! the read-only install console.

use std::sync::{Arc, Mutex};

/// Modal user-facing error presentation, provided by the embedding
/// application.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayService {
    fn show_error_message(&self, title: &str, message: &str);
}

/// Text shown by the install console widget.
///
/// The widget is read-only towards the user; the host appends output chunks
/// as they arrive. Clones share the underlying text, so the panel renders
/// from one handle while the host writes through another.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBuffer {
    contents: Arc<Mutex<String>>,
}

impl ConsoleBuffer {
    /// Appends `chunk` as-is. Chunks carry their own separators.
    pub fn append(&self, chunk: &str) {
        self.contents
            .lock()
            .expect("failed to acquire the lock")
            .push_str(chunk);
    }

    pub fn clear(&self) {
        self.contents
            .lock()
            .expect("failed to acquire the lock")
            .clear();
    }

    /// Snapshot of the current text.
    pub fn contents(&self) -> String {
        self.contents
            .lock()
            .expect("failed to acquire the lock")
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.contents
            .lock()
            .expect("failed to acquire the lock")
            .is_empty()
    }
}
