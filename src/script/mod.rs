//! Persisted outputs: the remediation script artifact and optional
//! per-object debug snapshots.

mod debug;
mod writer;

pub use debug::DebugSink;
pub use writer::{script_file_name, ScriptWriter, WriteError};
