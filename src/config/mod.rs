//! Configuration module for drift.
//!
//! Handles connection settings, comparison tuning, and environment variable
//! expansion.

mod settings;

pub use settings::{
    expand_env_vars, CompareSettings, ConnectionSettings, Settings, SettingsError,
};
