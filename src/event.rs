//! Channel plumbing shared by the host runtime and the console event bus.

pub mod broadcaster;
pub mod channel;
