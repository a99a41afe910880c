//! # Till Testkit
//!
//! Shared test infrastructure for the till bridge: a scripted transport that
//! plays the native host, listener fixtures, and context builders wired to
//! that transport.

pub mod fixtures;
pub mod transport;

pub use fixtures::{
    panicking_listener, scripted_context, scripted_context_with, CountingListener,
    RecordingListener,
};
pub use transport::{Invocation, ScriptedTransport};
