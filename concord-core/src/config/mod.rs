//! Configuration system for Concord.
//! TOML-based: project file > environment > compiled defaults.

pub mod reconcile_config;

pub use reconcile_config::{ReconcileConfig, ReconcileScope};
