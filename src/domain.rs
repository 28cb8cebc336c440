//! Domain models for the item registry.
//!
//! This module contains the item record, its validated text fields, and the
//! program configuration.

/// Item domain model.
pub mod item;
pub use item::{Field, FieldError, Item};

mod config;
pub use config::{Config, ConfigError};
